use std::io::Write;

use anyhow::Result;
use daylight::ThemeSnapshot;

use crate::cli::OutputFormat;
use crate::palette::Palette;

/// Writes `snapshot` in the requested format.
///
/// Json output is one object per line so `watch` produces a stream.
pub fn render(snapshot: &ThemeSnapshot, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, snapshot)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            let palette = Palette::new();
            let theme = snapshot.resolved;
            let flag = if snapshot.dark { "on" } else { "off" };
            let rows = [
                ("preference", snapshot.preference.as_str()),
                ("resolved", theme.as_str()),
                ("dark flag", flag),
            ];
            for (label, value) in rows {
                writeln!(
                    out,
                    "{} {}",
                    palette.label(theme).apply_to(format!("{:<11}", label)),
                    palette.value(theme).apply_to(value)
                )?;
            }
        }
    }
    Ok(())
}
