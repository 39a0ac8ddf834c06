use anyhow::{anyhow, Result};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use skein::math::vec2;
use skein::text::{
    CachedMetrics, FontAttrs, FontFamilies, FontFamily, GlyphRunBuilder, RunStyle,
    SystemFontSource, TextAlign,
};
use skein::GlyphCommandDevice;

fn main() -> Result<()> {
    SimpleLogger::new().with_level(LevelFilter::Warn).init()?;

    let text = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Hello, glyph runs!".to_owned());

    let mut fonts = SystemFontSource::new();
    let attrs = FontAttrs {
        families: FontFamilies::new(FontFamily::new("DejaVu Sans"))
            .with(FontFamily::sans_serif()),
        ..Default::default()
    };

    let id = fonts
        .query(&attrs)
        .ok_or_else(|| anyhow!("no typeface matches {:?}", attrs.families))?;
    let typeface = fonts.load(id)?;
    let metrics = CachedMetrics::new(typeface);

    let style = RunStyle {
        size: 24.0,
        align: TextAlign::Center,
        typeface: id,
        ..Default::default()
    };

    let mut builder = GlyphRunBuilder::new();
    builder.prepare_text(typeface, &metrics, &style, text.as_bytes(), vec2(400.0, 300.0));

    let Some(run) = builder.current_run() else {
        println!("nothing to draw");
        return Ok(());
    };

    println!("{} glyphs, {} unique", run.len(), run.unique_glyph_ids().len());
    for (glyph, pos) in run.glyph_ids().iter().zip(run.positions()) {
        println!("{glyph:>5} at ({:.2}, {:.2})", pos.x, pos.y);
    }

    let mut device = GlyphCommandDevice::new();
    run.draw_to(&mut device);
    println!("{} draw commands", device.commands().len());

    Ok(())
}
