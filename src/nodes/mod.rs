pub mod error_probe;
pub mod reconstructor;
pub mod spectrum_analyzer;
pub mod summary;
pub mod time_window;
pub mod tone_generator;

pub use error_probe::ErrorProbe;
pub use reconstructor::Reconstructor;
pub use spectrum_analyzer::SpectrumAnalyzer;
pub use summary::{ChannelStats, Summary};
pub use time_window::TimeWindow;
pub use tone_generator::ToneGenerator;

/// Touch every built-in stage so their registry entries are linked into
/// binaries that only reach them through the registry.
pub(crate) fn link_builtin_stages() {
    let _ = (
        ToneGenerator::default(),
        Reconstructor::default(),
        SpectrumAnalyzer::default(),
        ErrorProbe,
        TimeWindow::default(),
        Summary::default(),
    );
}
