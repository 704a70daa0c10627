//! KML rendering of footprints

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use super::circle::Footprint;
use super::{FootprintSink, Metadata};

/// Visual style of a footprint polygon
///
/// Colors use KML's `aabbggrr` hex notation.
#[derive(Debug, Clone, PartialEq)]
pub struct KmlStyle {
    pub line_color: String,
    pub line_width: f64,
    pub fill_color: String,
    /// Heading of the description block
    pub title: String,
}

impl Default for KmlStyle {
    fn default() -> Self {
        Self {
            line_color: "ff00ff00".to_string(),
            line_width: 3.0,
            // Green at alpha 100/255
            fill_color: "6400ff00".to_string(),
            title: "Torre de Colo".to_string(),
        }
    }
}

/// Writes footprints as single-placemark KML 2.2 documents
#[derive(Debug, Clone, Default)]
pub struct KmlWriter {
    style: KmlStyle,
}

impl KmlWriter {
    /// Creates a writer with the default green style
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer with a custom style
    pub fn with_style(style: KmlStyle) -> Self {
        Self { style }
    }

    /// Returns the active style
    pub fn style(&self) -> &KmlStyle {
        &self.style
    }

    /// Renders the full KML document for a footprint
    pub fn render(&self, footprint: &Footprint, label: &str, metadata: &Metadata) -> String {
        let mut out = String::with_capacity(2048 + footprint.ring.len() * 48);

        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str("<kml xmlns=\"http://www.opengis.net/kml/2.2\">\n");
        out.push_str("  <Document>\n");
        out.push_str("    <Style id=\"footprint\">\n");
        out.push_str("      <LineStyle>\n");
        out.push_str(&format!("        <color>{}</color>\n", escape_xml(&self.style.line_color)));
        out.push_str(&format!("        <width>{}</width>\n", self.style.line_width));
        out.push_str("      </LineStyle>\n");
        out.push_str("      <PolyStyle>\n");
        out.push_str(&format!("        <color>{}</color>\n", escape_xml(&self.style.fill_color)));
        out.push_str("      </PolyStyle>\n");
        out.push_str("    </Style>\n");
        out.push_str("    <Placemark>\n");
        out.push_str(&format!("      <name>{}</name>\n", escape_xml(label)));
        out.push_str(&format!(
            "      <description>{}</description>\n",
            escape_xml(&self.description(metadata))
        ));
        out.push_str("      <styleUrl>#footprint</styleUrl>\n");
        out.push_str("      <Polygon>\n");
        out.push_str("        <outerBoundaryIs>\n");
        out.push_str("          <LinearRing>\n");
        out.push_str("            <coordinates>");

        let tuples: Vec<String> = footprint
            .continuous_ring()
            .iter()
            .map(|point| {
                let (lon, lat) = point.lonlat();
                format!("{},{},0", lon, lat)
            })
            .collect();
        out.push_str(&tuples.join(" "));

        out.push_str("</coordinates>\n");
        out.push_str("          </LinearRing>\n");
        out.push_str("        </outerBoundaryIs>\n");
        out.push_str("      </Polygon>\n");
        out.push_str("    </Placemark>\n");
        out.push_str("  </Document>\n");
        out.push_str("</kml>\n");

        out
    }

    /// HTML description shown in the placemark balloon
    fn description(&self, metadata: &Metadata) -> String {
        let mut html = format!("<b>{}</b><br/>", escape_xml(&self.style.title));
        for (key, value) in metadata.iter() {
            html.push_str(&format!("{}: {}<br/>", escape_xml(key), escape_xml(value)));
        }
        html
    }
}

impl FootprintSink for KmlWriter {
    fn write_footprint(
        &self,
        path: &Path,
        footprint: &Footprint,
        label: &str,
        metadata: &Metadata,
    ) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::file_write(parent, e))?;
        }

        let document = self.render(footprint, label, metadata);

        let file = File::create(path).map_err(|e| Error::file_write(path, e))?;
        let mut writer = BufWriter::new(file);
        writer.write_all(document.as_bytes()).map_err(|e| Error::file_write(path, e))?;
        writer.flush().map_err(|e| Error::file_write(path, e))
    }
}

/// Escapes the five XML special characters
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
