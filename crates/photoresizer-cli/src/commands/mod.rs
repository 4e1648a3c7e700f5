pub mod config;
pub mod estimate;
pub mod info;
pub mod resize;

use clap::ValueEnum;
use photoresizer_core::format::OutputFormat;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FormatArg {
    #[value(alias = "jpg")]
    Jpeg,
    Png,
    Webp,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Jpeg => OutputFormat::Jpeg,
            FormatArg::Png => OutputFormat::Png,
            FormatArg::Webp => OutputFormat::Webp,
        }
    }
}
