use std::fs;

use camino::Utf8Path;

use crate::error::OsmprjError;
use crate::reports::{CellValue, FieldSpec};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

pub fn print_table(title: &str, fields: &[FieldSpec], rows: &[Vec<CellValue>]) {
    let formatted: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .zip(fields)
                .map(|(value, field)| (field.format)(value))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            formatted
                .iter()
                .map(|row| row[i].chars().count())
                .chain([field.label.chars().count()])
                .max()
                .unwrap_or(0)
        })
        .collect();

    println!("{BOLD}{title}{RESET}");
    let header: Vec<String> = fields
        .iter()
        .zip(&widths)
        .map(|(field, &width)| format!("{:width$}", field.label))
        .collect();
    println!("{}", header.join("  "));
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    println!("{}", rule.join("  "));

    for row in &formatted {
        let cells: Vec<String> = row
            .iter()
            .zip(fields)
            .zip(&widths)
            .map(|((cell, field), &width)| {
                format!("{}{:width$}{}", field.color, cell, RESET)
            })
            .collect();
        println!("{}", cells.join("  "));
    }
}

pub fn write_bar_chart(
    output_file: &Utf8Path,
    title: &str,
    xaxis_title: &str,
    yaxis_title: &str,
    data: &[(String, f64)],
) -> Result<(), OsmprjError> {
    let max = data
        .iter()
        .map(|(_, value)| *value)
        .fold(0.0_f64, f64::max)
        .max(f64::MIN_POSITIVE);

    let mut bars = String::new();
    for (label, value) in data {
        let percent = (value / max * 100.0).clamp(0.0, 100.0);
        bars.push_str(&format!(
            concat!(
                "      <div class=\"row\">\n",
                "        <div class=\"label\">{label}</div>\n",
                "        <div class=\"track\">",
                "<div class=\"bar\" style=\"width: {percent:.1}%\">",
                "<span>{value:.2}</span></div></div>\n",
                "      </div>\n"
            ),
            label = escape_html(label),
            percent = percent,
            value = value,
        ));
    }

    let generated = chrono::Utc::now().to_rfc3339();
    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <style>
    body {{ font-family: Lora, Georgia, serif; color: #666; margin: 2rem; }}
    h1 {{ font-weight: normal; }}
    .axis {{ color: #999; margin: 0.25rem 0 1rem; }}
    .row {{ display: flex; align-items: center; margin: 0.4rem 0; }}
    .label {{ width: 14rem; text-align: right; padding-right: 0.75rem; }}
    .track {{ flex: 1; background: #f4f4f4; }}
    .bar {{ background: #45818e; color: #fff; padding: 0.2rem 0; }}
    .bar span {{ padding-left: 0.5rem; }}
    footer {{ color: #bbb; margin-top: 2rem; font-size: 0.8rem; }}
  </style>
</head>
<body>
  <h1>{title}</h1>
  <div class="axis">{yaxis} by {xaxis}</div>
  <div class="chart">
{bars}  </div>
  <footer>generated by osmprj {version} at {generated}</footer>
</body>
</html>
"#,
        title = escape_html(title),
        xaxis = escape_html(xaxis_title),
        yaxis = escape_html(yaxis_title),
        bars = bars,
        version = env!("CARGO_PKG_VERSION"),
        generated = generated,
    );

    fs::write(output_file.as_std_path(), html)
        .map_err(|err| OsmprjError::Filesystem(err.to_string()))?;
    Ok(())
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;

    use super::*;

    #[test]
    fn bar_chart_contains_labels_and_values() {
        let temp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(temp.path().join("chart.html")).unwrap();

        write_bar_chart(
            &path,
            "Amenity count by city: cafe",
            "Amenities per sq. km",
            "City",
            &[("Munich".to_string(), 3.25), ("Berlin".to_string(), 1.5)],
        )
        .unwrap();

        let html = fs::read_to_string(path.as_std_path()).unwrap();
        assert!(html.contains("Amenity count by city: cafe"));
        assert!(html.contains("Munich"));
        assert!(html.contains("3.25"));
        assert!(html.contains("width: 100.0%"));
    }

    #[test]
    fn bar_chart_escapes_markup() {
        let temp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(temp.path().join("chart.html")).unwrap();

        write_bar_chart(&path, "<script>", "x", "y", &[("a&b".to_string(), 1.0)]).unwrap();
        let html = fs::read_to_string(path.as_std_path()).unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a&amp;b"));
    }
}
