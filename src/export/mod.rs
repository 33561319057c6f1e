use anyhow::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::db::ResultSet;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Html,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Html => "html",
        }
    }
}

/// Write a query result set to a file. Returns the number of rows written.
pub fn export_results(
    result: &ResultSet,
    label: &str,
    output_path: &Path,
    format: ExportFormat,
) -> Result<usize> {
    match format {
        ExportFormat::Json => export_json(result, output_path)?,
        ExportFormat::Csv => export_csv(result, output_path)?,
        ExportFormat::Html => export_html(result, label, output_path)?,
    }

    Ok(result.rows.len())
}

fn export_json(result: &ResultSet, output_path: &Path) -> Result<()> {
    let objects: Vec<serde_json::Value> = result
        .rows
        .iter()
        .map(|row| {
            let map: serde_json::Map<String, serde_json::Value> = result
                .columns
                .iter()
                .zip(row.iter())
                .map(|(col, val)| (col.clone(), serde_json::Value::String(val.clone())))
                .collect();
            serde_json::Value::Object(map)
        })
        .collect();

    let json = serde_json::to_string_pretty(&objects)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

fn export_csv(result: &ResultSet, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(&result.columns)?;
    for row in &result.rows {
        wtr.write_record(row)?;
    }

    wtr.flush()?;
    Ok(())
}

fn export_html(result: &ResultSet, label: &str, output_path: &Path) -> Result<()> {
    let mut html = String::new();

    html.push_str(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Curio Query Export</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            max-width: 1200px;
            margin: 0 auto;
            padding: 20px;
            background: #1a1a1a;
            color: #e0e0e0;
        }
        h1 {
            color: #4fc3f7;
            border-bottom: 2px solid #4fc3f7;
            padding-bottom: 10px;
        }
        .stats {
            background: #2d2d2d;
            padding: 15px;
            border-radius: 8px;
            margin-bottom: 20px;
        }
        table {
            width: 100%;
            border-collapse: collapse;
            margin-top: 20px;
        }
        th, td {
            padding: 10px;
            text-align: left;
            border-bottom: 1px solid #404040;
        }
        th {
            background: #2d2d2d;
            color: #4fc3f7;
        }
        tr:hover {
            background: #333;
        }
    </style>
</head>
<body>
"#,
    );

    html.push_str(&format!("    <h1>{}</h1>\n", html_escape(label)));
    html.push_str(&format!(
        "    <div class=\"stats\"><strong>Rows:</strong> {}</div>\n",
        result.rows.len()
    ));

    html.push_str("    <table>\n        <tr>\n");
    for col in &result.columns {
        html.push_str(&format!("            <th>{}</th>\n", html_escape(col)));
    }
    html.push_str("        </tr>\n");

    for row in &result.rows {
        html.push_str("        <tr>\n");
        for value in row {
            html.push_str(&format!("            <td>{}</td>\n", html_escape(value)));
        }
        html.push_str("        </tr>\n");
    }

    html.push_str("    </table>\n</body>\n</html>\n");

    let mut file = File::create(output_path)?;
    file.write_all(html.as_bytes())?;
    Ok(())
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_set() -> ResultSet {
        ResultSet {
            columns: vec!["culture".to_string(), "artifact_count".to_string()],
            rows: vec![
                vec!["Greek".to_string(), "120".to_string()],
                vec!["Byzantine".to_string(), "87".to_string()],
            ],
        }
    }

    #[test]
    fn test_export_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let count = export_results(&result_set(), "Q22", &path, ExportFormat::Json).unwrap();
        assert_eq!(count, 2);

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["culture"], "Greek");
        assert_eq!(parsed[1]["artifact_count"], "87");
    }

    #[test]
    fn test_export_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        export_results(&result_set(), "Q22", &path, ExportFormat::Csv).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "culture,artifact_count");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_export_html_escapes_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.html");
        let mut rs = result_set();
        rs.rows[0][0] = "<Greek>".to_string();
        export_results(&rs, "Top 5 cultures", &path, ExportFormat::Html).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Top 5 cultures"));
        assert!(content.contains("&lt;Greek&gt;"));
        assert!(!content.contains("<Greek>"));
    }
}
