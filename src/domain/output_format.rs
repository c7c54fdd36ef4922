/// How the accumulated process report is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Grid,
    Csv,
    Tab,
    Vertical,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Grid,
        OutputFormat::Csv,
        OutputFormat::Tab,
        OutputFormat::Vertical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Grid => "grid",
            OutputFormat::Csv => "csv",
            OutputFormat::Tab => "tab",
            OutputFormat::Vertical => "vertical",
        }
    }
}
