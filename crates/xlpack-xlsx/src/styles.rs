//! XLSX styles (styles.xml) read/write helpers

use std::io::{BufReader, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::xml::escape_xml_attr;
use xlpack_core::style::{
    Alignment, Border, BorderEdge, BorderLineStyle, CellFormat, CellStyle, Color, Fill, Font,
    FontScheme, HorizontalAlignment, NumberFormat, PatternType, StyleTable, VerticalAlignment,
};

/// Namespace of SpreadsheetML parts
pub const SPREADSHEETML_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

/// Markup-compatibility namespace
pub const MC_NS: &str = "http://schemas.openxmlformats.org/markup-compatibility/2006";

/// Extension prefixes a consumer may ignore when it does not understand them
pub const IGNORABLE_PREFIXES: &str = "x14ac x16r2 xr";

const STYLESHEET_OPEN: &str = concat!(
    r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main""#,
    r#" xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006""#,
    r#" mc:Ignorable="x14ac x16r2 xr""#,
    r#" xmlns:x14ac="http://schemas.microsoft.com/office/spreadsheetml/2009/9/ac""#,
    r#" xmlns:x16r2="http://schemas.microsoft.com/office/spreadsheetml/2015/02/main""#,
    r#" xmlns:xr="http://schemas.microsoft.com/office/spreadsheetml/2014/revision">"#,
);

// === Writing ===

/// Serialize a style table as a complete `styles.xml` document.
///
/// Children are emitted in the order the schema requires: `numFmts`, `fonts`,
/// `fills`, `borders`, `cellStyleXfs`, `cellXfs`, `cellStyles`, `dxfs`,
/// `tableStyles`.
pub fn write_styles_xml(table: &StyleTable) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n");
    xml.push_str(STYLESHEET_OPEN);

    if !table.number_formats().is_empty() {
        xml.push_str(&format!(
            "\n  <numFmts count=\"{}\">",
            table.number_formats().len()
        ));
        for fmt in table.number_formats() {
            xml.push_str(&format!(
                "\n    <numFmt numFmtId=\"{}\" formatCode=\"{}\"/>",
                fmt.id,
                escape_xml_attr(&fmt.code)
            ));
        }
        xml.push_str("\n  </numFmts>");
    }

    xml.push_str(&format!(
        "\n  <fonts count=\"{}\" x14ac:knownFonts=\"1\">",
        table.fonts().len()
    ));
    for font in table.fonts() {
        xml.push_str("\n    ");
        xml.push_str(&write_font(font));
    }
    xml.push_str("\n  </fonts>");

    xml.push_str(&format!("\n  <fills count=\"{}\">", table.fills().len()));
    for fill in table.fills() {
        xml.push_str("\n    ");
        xml.push_str(&write_fill(fill));
    }
    xml.push_str("\n  </fills>");

    xml.push_str(&format!("\n  <borders count=\"{}\">", table.borders().len()));
    for border in table.borders() {
        xml.push_str("\n    ");
        xml.push_str(&write_border(border));
    }
    xml.push_str("\n  </borders>");

    xml.push_str(&format!(
        "\n  <cellStyleXfs count=\"{}\">",
        table.cell_style_formats().len()
    ));
    for xf in table.cell_style_formats() {
        xml.push_str("\n    ");
        xml.push_str(&write_xf(xf));
    }
    xml.push_str("\n  </cellStyleXfs>");

    xml.push_str(&format!(
        "\n  <cellXfs count=\"{}\">",
        table.cell_formats().len()
    ));
    for xf in table.cell_formats() {
        xml.push_str("\n    ");
        xml.push_str(&write_xf(xf));
    }
    xml.push_str("\n  </cellXfs>");

    xml.push_str(&format!(
        "\n  <cellStyles count=\"{}\">",
        table.cell_styles().len()
    ));
    for style in table.cell_styles() {
        xml.push_str(&format!(
            "\n    <cellStyle name=\"{}\" xfId=\"{}\"",
            escape_xml_attr(&style.name),
            style.format_id
        ));
        if let Some(id) = style.builtin_id {
            xml.push_str(&format!(" builtinId=\"{}\"", id));
        }
        xml.push_str("/>");
    }
    xml.push_str("\n  </cellStyles>");

    xml.push_str("\n  <dxfs count=\"0\"/>");
    xml.push_str(
        r#"
  <tableStyles count="0" defaultTableStyle="TableStyleMedium2" defaultPivotStyle="PivotStyleLight16"/>"#,
    );

    xml.push_str("\n</styleSheet>");
    xml
}

fn color_attrs(color: &Color) -> String {
    match color {
        Color::Auto => " auto=\"1\"".to_string(),
        Color::Rgb { .. } | Color::Argb { .. } => {
            format!(" rgb=\"{}\"", color.to_argb_hex().unwrap_or_default())
        }
        Color::Indexed(i) => format!(" indexed=\"{}\"", i),
        Color::Theme { index, tint } => {
            if *tint == 0.0 {
                format!(" theme=\"{}\"", index)
            } else {
                format!(" theme=\"{}\" tint=\"{}\"", index, tint)
            }
        }
    }
}

fn write_color(tag: &str, color: &Color) -> String {
    format!("<{tag}{}/>", color_attrs(color))
}

fn write_font(font: &Font) -> String {
    let mut s = String::from("<font>");
    if font.bold {
        s.push_str("<b/>");
    }
    if font.italic {
        s.push_str("<i/>");
    }
    if font.underline {
        s.push_str("<u/>");
    }
    s.push_str(&format!("<sz val=\"{}\"/>", font.size));
    s.push_str(&write_color("color", &font.color));
    s.push_str(&format!("<name val=\"{}\"/>", escape_xml_attr(&font.name)));
    if let Some(family) = font.family {
        s.push_str(&format!("<family val=\"{}\"/>", family));
    }
    if let Some(scheme) = font.scheme.xlsx_name() {
        s.push_str(&format!("<scheme val=\"{}\"/>", scheme));
    }
    s.push_str("</font>");
    s
}

fn write_fill(fill: &Fill) -> String {
    let pattern = fill.pattern.xlsx_name();
    if fill.foreground.is_none() && fill.background.is_none() {
        return format!("<fill><patternFill patternType=\"{}\"/></fill>", pattern);
    }
    let mut s = format!("<fill><patternFill patternType=\"{}\">", pattern);
    if let Some(fg) = &fill.foreground {
        s.push_str(&write_color("fgColor", fg));
    }
    if let Some(bg) = &fill.background {
        s.push_str(&write_color("bgColor", bg));
    }
    s.push_str("</patternFill></fill>");
    s
}

fn write_border_edge(tag: &str, edge: &BorderEdge) -> String {
    let Some(style) = edge.style.xlsx_name() else {
        return format!("<{tag}/>");
    };
    match &edge.color {
        None => format!("<{tag} style=\"{}\"/>", style),
        Some(color) => format!(
            "<{tag} style=\"{}\">{}</{tag}>",
            style,
            write_color("color", color)
        ),
    }
}

fn write_border(border: &Border) -> String {
    let mut attrs = String::new();
    if border.diagonal_up {
        attrs.push_str(" diagonalUp=\"1\"");
    }
    if border.diagonal_down {
        attrs.push_str(" diagonalDown=\"1\"");
    }

    let mut s = format!("<border{}>", attrs);
    s.push_str(&write_border_edge("left", &border.left));
    s.push_str(&write_border_edge("right", &border.right));
    s.push_str(&write_border_edge("top", &border.top));
    s.push_str(&write_border_edge("bottom", &border.bottom));
    s.push_str(&write_border_edge("diagonal", &border.diagonal));
    s.push_str("</border>");
    s
}

fn write_alignment(al: &Alignment) -> String {
    if al.is_empty() {
        return String::new();
    }
    let mut s = String::from("<alignment");
    if let Some(h) = al.horizontal {
        s.push_str(&format!(" horizontal=\"{}\"", h.xlsx_name()));
    }
    if let Some(v) = al.vertical {
        s.push_str(&format!(" vertical=\"{}\"", v.xlsx_name()));
    }
    if al.wrap_text {
        s.push_str(" wrapText=\"1\"");
    }
    s.push_str("/>");
    s
}

fn write_xf(xf: &CellFormat) -> String {
    let mut s = format!(
        "<xf numFmtId=\"{}\" fontId=\"{}\" fillId=\"{}\" borderId=\"{}\"",
        xf.number_format_id, xf.font_id, xf.fill_id, xf.border_id
    );
    if let Some(base) = xf.format_id {
        s.push_str(&format!(" xfId=\"{}\"", base));
    }
    if xf.apply_number_format {
        s.push_str(" applyNumberFormat=\"1\"");
    }
    if xf.apply_font {
        s.push_str(" applyFont=\"1\"");
    }
    if xf.apply_fill {
        s.push_str(" applyFill=\"1\"");
    }
    if xf.apply_border {
        s.push_str(" applyBorder=\"1\"");
    }
    if xf.apply_alignment {
        s.push_str(" applyAlignment=\"1\"");
    }

    let alignment_xml = xf
        .alignment
        .as_ref()
        .map(write_alignment)
        .unwrap_or_default();
    if alignment_xml.is_empty() {
        s.push_str("/>");
        return s;
    }
    s.push('>');
    s.push_str(&alignment_xml);
    s.push_str("</xf>");
    s
}

// === Reading ===

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    NumFmts,
    Fonts,
    Fills,
    Borders,
    CellStyleXfs,
    CellXfs,
    CellStyles,
    /// Anything whose content is not part of the catalogue (dxfs, colors, extLst, ...)
    Skipped,
}

#[derive(Debug, Clone, Copy)]
enum EdgeSlot {
    Left,
    Right,
    Top,
    Bottom,
    Diagonal,
}

impl EdgeSlot {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        Some(match tag {
            b"left" | b"start" => EdgeSlot::Left,
            b"right" | b"end" => EdgeSlot::Right,
            b"top" => EdgeSlot::Top,
            b"bottom" => EdgeSlot::Bottom,
            b"diagonal" => EdgeSlot::Diagonal,
            _ => return None,
        })
    }

    fn edge_mut(self, border: &mut Border) -> &mut BorderEdge {
        match self {
            EdgeSlot::Left => &mut border.left,
            EdgeSlot::Right => &mut border.right,
            EdgeSlot::Top => &mut border.top,
            EdgeSlot::Bottom => &mut border.bottom,
            EdgeSlot::Diagonal => &mut border.diagonal,
        }
    }
}

/// Parse `styles.xml` markup into a style table.
///
/// Entries are taken positionally and are not checked against each other:
/// a table read from nonconforming markup keeps its dangling references so
/// the schema validator can report them. Only markup that is not well-formed
/// XML is an error.
pub fn read_styles_xml<R: Read>(reader: R) -> XlsxResult<StyleTable> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut table = StyleTable::empty();

    let mut section = Section::None;
    let mut skip_depth = 0usize;
    let mut seen_root = false;

    let mut current_font: Option<Font> = None;
    let mut current_fill: Option<Fill> = None;
    let mut current_border: Option<Border> = None;
    let mut current_edge: Option<EdgeSlot> = None;
    let mut current_xf: Option<CellFormat> = None;

    loop {
        buf.clear();
        let event = xml_reader.read_event_into(&mut buf)?;
        let (e, is_empty) = match event {
            Event::Start(e) => (e, false),
            Event::Empty(e) => (e, true),
            Event::End(e) => {
                if skip_depth > 0 {
                    skip_depth -= 1;
                    if skip_depth == 0 {
                        section = Section::None;
                    }
                    continue;
                }
                match e.local_name().as_ref() {
                    b"numFmts" | b"fonts" | b"fills" | b"borders" | b"cellStyleXfs"
                    | b"cellXfs" | b"cellStyles" => section = Section::None,
                    b"font" => {
                        if let Some(font) = current_font.take() {
                            table.push_font(font);
                        }
                    }
                    b"fill" => {
                        if let Some(fill) = current_fill.take() {
                            table.push_fill(fill);
                        }
                    }
                    b"border" => {
                        if let Some(border) = current_border.take() {
                            table.push_border(border);
                        }
                        current_edge = None;
                    }
                    b"left" | b"right" | b"top" | b"bottom" | b"diagonal" | b"start"
                    | b"end" => current_edge = None,
                    b"xf" => {
                        if let Some(xf) = current_xf.take() {
                            push_xf(&mut table, section, xf);
                        }
                    }
                    _ => {}
                }
                continue;
            }
            Event::Eof => break,
            _ => continue,
        };

        if skip_depth > 0 {
            if !is_empty {
                skip_depth += 1;
            }
            continue;
        }

        let name = e.local_name();
        match (section, name.as_ref()) {
            (Section::None, b"styleSheet") => seen_root = true,
            (Section::None, b"numFmts") if !is_empty => section = Section::NumFmts,
            (Section::None, b"fonts") if !is_empty => section = Section::Fonts,
            (Section::None, b"fills") if !is_empty => section = Section::Fills,
            (Section::None, b"borders") if !is_empty => section = Section::Borders,
            (Section::None, b"cellStyleXfs") if !is_empty => section = Section::CellStyleXfs,
            (Section::None, b"cellXfs") if !is_empty => section = Section::CellXfs,
            (Section::None, b"cellStyles") if !is_empty => section = Section::CellStyles,
            (Section::None, _) => {
                if !is_empty {
                    section = Section::Skipped;
                    skip_depth = 1;
                }
            }

            (Section::NumFmts, b"numFmt") => {
                let mut id = None;
                let mut code = String::new();
                for attr in e.attributes().flatten() {
                    match attr.key.local_name().as_ref() {
                        b"numFmtId" => id = attr.unescape_value()?.parse::<u32>().ok(),
                        b"formatCode" => code = attr.unescape_value()?.into_owned(),
                        _ => {}
                    }
                }
                if let Some(id) = id {
                    table.push_number_format(NumberFormat { id, code });
                }
            }

            (Section::Fonts, b"font") => {
                let font = blank_font();
                if is_empty {
                    table.push_font(font);
                } else {
                    current_font = Some(font);
                }
            }
            (Section::Fonts, tag) => {
                if let Some(font) = current_font.as_mut() {
                    apply_font_child(font, tag, &e)?;
                }
            }

            (Section::Fills, b"fill") => {
                if is_empty {
                    table.push_fill(Fill::none());
                } else {
                    current_fill = Some(Fill::none());
                }
            }
            (Section::Fills, b"patternFill") => {
                if let Some(fill) = current_fill.as_mut() {
                    fill.pattern = attr_value(&e, b"patternType")?
                        .as_deref()
                        .and_then(PatternType::from_xlsx)
                        .unwrap_or(PatternType::None);
                }
            }
            (Section::Fills, b"fgColor") => {
                if let Some(fill) = current_fill.as_mut() {
                    fill.foreground = Some(parse_color_attrs(&e));
                }
            }
            (Section::Fills, b"bgColor") => {
                if let Some(fill) = current_fill.as_mut() {
                    fill.background = Some(parse_color_attrs(&e));
                }
            }

            (Section::Borders, b"border") => {
                let mut border = Border::new();
                for attr in e.attributes().flatten() {
                    match attr.key.local_name().as_ref() {
                        b"diagonalUp" => border.diagonal_up = is_true(&attr.unescape_value()?),
                        b"diagonalDown" => {
                            border.diagonal_down = is_true(&attr.unescape_value()?)
                        }
                        _ => {}
                    }
                }
                if is_empty {
                    table.push_border(border);
                } else {
                    current_border = Some(border);
                }
            }
            (Section::Borders, b"color") => {
                if let (Some(border), Some(slot)) = (current_border.as_mut(), current_edge) {
                    slot.edge_mut(border).color = Some(parse_color_attrs(&e));
                }
            }
            (Section::Borders, tag) => {
                if let (Some(border), Some(slot)) = (current_border.as_mut(), EdgeSlot::from_tag(tag))
                {
                    let edge = slot.edge_mut(border);
                    edge.style = attr_value(&e, b"style")?
                        .as_deref()
                        .and_then(BorderLineStyle::from_xlsx)
                        .unwrap_or(BorderLineStyle::None);
                    if !is_empty {
                        current_edge = Some(slot);
                    }
                }
            }

            (Section::CellStyleXfs | Section::CellXfs, b"xf") => {
                let xf = parse_xf_attrs(&e)?;
                if is_empty {
                    push_xf(&mut table, section, xf);
                } else {
                    current_xf = Some(xf);
                }
            }
            (Section::CellStyleXfs | Section::CellXfs, b"alignment") => {
                if let Some(xf) = current_xf.as_mut() {
                    xf.alignment = Some(parse_alignment(&e)?);
                }
            }

            (Section::CellStyles, b"cellStyle") => {
                let mut style = CellStyle {
                    name: String::new(),
                    format_id: 0,
                    builtin_id: None,
                };
                for attr in e.attributes().flatten() {
                    match attr.key.local_name().as_ref() {
                        b"name" => style.name = attr.unescape_value()?.into_owned(),
                        b"xfId" => {
                            style.format_id = attr.unescape_value()?.parse().unwrap_or(0)
                        }
                        b"builtinId" => {
                            style.builtin_id = attr.unescape_value()?.parse().ok()
                        }
                        _ => {}
                    }
                }
                table.push_cell_style(style);
            }

            _ => {}
        }
    }

    if !seen_root {
        return Err(XlsxError::Parse(
            "styles markup has no <styleSheet> root".to_string(),
        ));
    }

    Ok(table)
}

fn push_xf(table: &mut StyleTable, section: Section, xf: CellFormat) {
    match section {
        Section::CellStyleXfs => {
            table.push_cell_style_format(CellFormat {
                format_id: None,
                ..xf
            });
        }
        Section::CellXfs => {
            table.push_cell_format(xf);
        }
        _ => {}
    }
}

/// A font with only what the markup states: no color, family or scheme.
fn blank_font() -> Font {
    Font {
        color: Color::Auto,
        family: None,
        scheme: FontScheme::None,
        ..Font::default()
    }
}

fn apply_font_child(font: &mut Font, tag: &[u8], e: &BytesStart<'_>) -> XlsxResult<()> {
    match tag {
        b"b" => font.bold = bool_val(e)?,
        b"i" => font.italic = bool_val(e)?,
        b"u" => {
            font.underline = attr_value(e, b"val")?.as_deref() != Some("none");
        }
        b"sz" => {
            if let Some(size) = attr_value(e, b"val")?.and_then(|v| v.parse::<f64>().ok()) {
                font.size = size;
            }
        }
        b"color" => font.color = parse_color_attrs(e),
        b"name" => {
            if let Some(name) = attr_value(e, b"val")? {
                font.name = name;
            }
        }
        b"family" => font.family = attr_value(e, b"val")?.and_then(|v| v.parse().ok()),
        b"scheme" => {
            font.scheme = attr_value(e, b"val")?
                .as_deref()
                .map(FontScheme::from_xlsx)
                .unwrap_or_default()
        }
        _ => {}
    }
    Ok(())
}

fn parse_xf_attrs(e: &BytesStart<'_>) -> XlsxResult<CellFormat> {
    let mut xf = CellFormat::new();
    for attr in e.attributes().flatten() {
        let value = attr.unescape_value()?;
        match attr.key.local_name().as_ref() {
            b"numFmtId" => xf.number_format_id = value.parse().unwrap_or(0),
            b"fontId" => xf.font_id = value.parse().unwrap_or(0),
            b"fillId" => xf.fill_id = value.parse().unwrap_or(0),
            b"borderId" => xf.border_id = value.parse().unwrap_or(0),
            b"xfId" => xf.format_id = value.parse().ok(),
            b"applyNumberFormat" => xf.apply_number_format = is_true(&value),
            b"applyFont" => xf.apply_font = is_true(&value),
            b"applyFill" => xf.apply_fill = is_true(&value),
            b"applyBorder" => xf.apply_border = is_true(&value),
            b"applyAlignment" => xf.apply_alignment = is_true(&value),
            _ => {}
        }
    }
    Ok(xf)
}

fn parse_alignment(e: &BytesStart<'_>) -> XlsxResult<Alignment> {
    let mut alignment = Alignment::new();
    for attr in e.attributes().flatten() {
        let value = attr.unescape_value()?;
        match attr.key.local_name().as_ref() {
            b"horizontal" => alignment.horizontal = HorizontalAlignment::from_xlsx(&value),
            b"vertical" => alignment.vertical = VerticalAlignment::from_xlsx(&value),
            b"wrapText" => alignment.wrap_text = is_true(&value),
            _ => {}
        }
    }
    Ok(alignment)
}

pub(crate) fn parse_color_attrs(e: &BytesStart<'_>) -> Color {
    // Priority: rgb > theme > indexed > auto
    let mut rgb: Option<String> = None;
    let mut theme: Option<u8> = None;
    let mut tint: Option<f64> = None;
    let mut indexed: Option<u8> = None;

    for attr in e.attributes().flatten() {
        let Ok(value) = attr.unescape_value() else {
            continue;
        };
        match attr.key.local_name().as_ref() {
            b"rgb" => rgb = Some(value.into_owned()),
            b"theme" => theme = value.parse().ok(),
            b"tint" => tint = value.parse().ok(),
            b"indexed" => indexed = value.parse().ok(),
            _ => {}
        }
    }

    match rgb.as_deref().and_then(Color::from_hex) {
        Some(Color::Argb { a: 0xFF, r, g, b }) => return Color::Rgb { r, g, b },
        Some(color) => return color,
        None => {}
    }
    if let Some(index) = theme {
        return Color::Theme {
            index,
            tint: tint.unwrap_or(0.0),
        };
    }
    if let Some(i) = indexed {
        return Color::Indexed(i);
    }
    Color::Auto
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> XlsxResult<Option<String>> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Boolean toggle elements (`<b/>`, `<i val="0"/>`) default to true.
fn bool_val(e: &BytesStart<'_>) -> XlsxResult<bool> {
    Ok(attr_value(e, b"val")?.map_or(true, |v| is_true(&v)))
}

pub(crate) fn is_true(value: &str) -> bool {
    matches!(value, "1" | "true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use xlpack_core::style::preset;

    #[test]
    fn test_programmatic_table_survives_serialization() {
        let table = StyleTable::programmatic();
        let xml = write_styles_xml(&table);
        let parsed = read_styles_xml(xml.as_bytes()).unwrap();
        assert_eq!(parsed, table);
    }

    #[test]
    fn test_written_children_are_in_schema_order() {
        let mut table = StyleTable::programmatic();
        table.add_number_format("0.00%");
        let xml = write_styles_xml(&table);

        let order = [
            "<numFmts", "<fonts", "<fills", "<borders", "<cellStyleXfs", "<cellXfs",
            "<cellStyles", "<dxfs", "<tableStyles",
        ];
        let positions: Vec<usize> = order.iter().map(|tag| xml.find(tag).unwrap()).collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_header_format_markup() {
        let table = StyleTable::programmatic();
        let xml = write_styles_xml(&table);
        assert!(xml.contains(r#"<cellXfs count="4">"#));
        assert!(xml.contains(
            r#"<xf numFmtId="0" fontId="1" fillId="2" borderId="0" xfId="0" applyFont="1" applyFill="1"/>"#
        ));
        assert!(xml.contains(r#"<fgColor theme="4" tint="0.5999938962981048"/>"#));
        assert!(xml.contains(r#"<alignment horizontal="center" vertical="center"/>"#));
        assert!(xml.contains(r#"<cellStyle name="Normal" xfId="0" builtinId="0"/>"#));
        assert!(xml.contains(r#"mc:Ignorable="x14ac x16r2 xr""#));
    }

    #[test]
    fn test_read_excel_style_markup() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <numFmts count="1"><numFmt numFmtId="164" formatCode="yyyy\-mm\-dd"/></numFmts>
  <fonts count="2">
    <font><sz val="11"/><color theme="1"/><name val="Calibri"/><family val="2"/><scheme val="minor"/></font>
    <font><b/><sz val="12"/><color rgb="FFFF0000"/><name val="Arial"/></font>
  </fonts>
  <fills count="2">
    <fill><patternFill patternType="none"/></fill>
    <fill><patternFill patternType="gray125"/></fill>
  </fills>
  <borders count="2">
    <border><left/><right/><top/><bottom/><diagonal/></border>
    <border><left style="thin"><color indexed="64"/></left><right/><top/><bottom style="double"/><diagonal/></border>
  </borders>
  <cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
  <cellXfs count="2">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>
    <xf numFmtId="164" fontId="1" fillId="0" borderId="1" xfId="0" applyFont="1" applyBorder="1"><alignment wrapText="1"/></xf>
  </cellXfs>
  <cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>
  <dxfs count="1"><dxf><font><b/></font></dxf></dxfs>
</styleSheet>"#;

        let table = read_styles_xml(xml.as_bytes()).unwrap();
        assert_eq!(table.number_formats()[0].code, "yyyy\\-mm\\-dd");
        assert_eq!(table.fonts().len(), 2);
        assert!(table.fonts()[1].bold);
        assert_eq!(table.fonts()[1].color, Color::rgb(255, 0, 0));
        assert_eq!(table.fills()[1].pattern, PatternType::Gray125);
        assert_eq!(table.borders()[1].left.style, BorderLineStyle::Thin);
        assert_eq!(table.borders()[1].left.color, Some(Color::Indexed(64)));
        assert_eq!(table.borders()[1].bottom.style, BorderLineStyle::Double);
        assert_eq!(table.cell_format_count(), 2);

        let xf = table.cell_format(1).unwrap();
        assert_eq!(xf.number_format_id, 164);
        assert!(xf.apply_border);
        assert!(xf.alignment.as_ref().unwrap().wrap_text);
        assert_eq!(table.cell_styles()[0].name, "Normal");
    }

    #[test]
    fn test_custom_formats_survive_serialization() {
        let mut table = StyleTable::programmatic();
        let font = table.add_font(
            Font::new()
                .with_italic(true)
                .with_color(Color::rgb(0x1F, 0x4E, 0x79)),
        );
        let border = table.add_border(Border::outline(BorderLineStyle::Thin, Color::Indexed(64)));
        let format = CellFormat::based_on(0)
            .with_font(font)
            .with_border(border)
            .with_alignment(
                Alignment::new()
                    .with_horizontal(HorizontalAlignment::Left)
                    .with_vertical(VerticalAlignment::Top),
            );
        let index = table.add_cell_format(format.clone()).unwrap();
        assert_eq!(table.add_cell_format(format).unwrap(), index);

        let xml = write_styles_xml(&table);
        assert!(xml.contains(r#"<font><i/><sz val="11"/><color rgb="FF1F4E79"/>"#));
        assert!(xml.contains(
            r#"<border><left style="thin"><color indexed="64"/></left><right style="thin">"#
        ));
        assert!(xml.contains(r#"<alignment horizontal="left" vertical="top"/>"#));

        assert_eq!(read_styles_xml(xml.as_bytes()).unwrap(), table);
    }

    #[test]
    fn test_dangling_references_are_kept() {
        let xml = r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
  <cellXfs count="1"><xf numFmtId="0" fontId="7" fillId="0" borderId="0"/></cellXfs>
</styleSheet>"#;
        let table = read_styles_xml(xml.as_bytes()).unwrap();
        assert_eq!(table.cell_format(0).unwrap().font_id, 7);
        assert!(table.check_references().is_err());
    }

    #[test]
    fn test_markup_without_root_is_rejected() {
        let result = read_styles_xml("<worksheet/>".as_bytes());
        assert!(matches!(result, Err(XlsxError::Parse(_))));
    }

    #[test]
    fn test_preset_indices_exist_after_reading() {
        let xml = write_styles_xml(&StyleTable::programmatic());
        let table = read_styles_xml(xml.as_bytes()).unwrap();
        for index in [
            preset::BODY,
            preset::BODY_CENTERED,
            preset::HEADER,
            preset::HEADER_CENTERED,
        ] {
            assert!(table.cell_format(index).is_some());
        }
    }
}
