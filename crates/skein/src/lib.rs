pub use skein_core::*;

pub mod text {
    pub use skein_core::text::*;
    #[cfg(feature = "fontdb")]
    pub use skein_fontdb::SystemFontSource;
    #[cfg(feature = "ttf")]
    pub use skein_ttf::TtfTypeface;
}
