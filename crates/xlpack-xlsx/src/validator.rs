//! Schema conformance checks for generated parts
//!
//! The validator parses a part into a small element tree and checks it
//! against the SpreadsheetML content model: allowed children and their
//! order, enumerated attribute values, `count` attributes and the index
//! references between style catalogues and cells. Problems are collected
//! into a [`ValidationReport`]; validation itself never fails.

use std::collections::HashSet;
use std::fmt;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use xlpack_core::{CellAddress, NumberFormat, Stylesheet};

use crate::part::{PartKind, STYLES_PART, WORKBOOK_PART};
use crate::styles::{write_styles_xml, MC_NS, SPREADSHEETML_NS};
use crate::writer::RenderedPart;
use crate::xml::is_xml_char;

/// One schema nonconformance found in a part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// Part the violation was found in
    pub part: String,
    /// Element path, e.g. `styleSheet/cellXfs/xf[2]`
    pub path: String,
    /// What is wrong
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.part, self.path, self.message)
    }
}

/// The violations found by one or more validation runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    violations: Vec<SchemaViolation>,
}

impl ValidationReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no violation was found
    pub fn is_conformant(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of violations
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// True when no violation was found
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// The violations in discovery order
    pub fn violations(&self) -> &[SchemaViolation] {
        &self.violations
    }

    /// Iterate over violations
    pub fn iter(&self) -> impl Iterator<Item = &SchemaViolation> {
        self.violations.iter()
    }

    /// Append the violations of another report
    pub fn merge(&mut self, other: ValidationReport) {
        self.violations.extend(other.violations);
    }

    /// Log every violation as a warning
    pub fn log_warnings(&self) {
        for violation in &self.violations {
            log::warn!("schema violation: {}", violation);
        }
    }

    /// Consume the report
    pub fn into_violations(self) -> Vec<SchemaViolation> {
        self.violations
    }
}

impl IntoIterator for ValidationReport {
    type Item = SchemaViolation;
    type IntoIter = std::vec::IntoIter<SchemaViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

// ==================== Element tree ====================

/// Namespace of relationship-id attributes such as `r:id`
const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

#[derive(Debug, Default)]
struct Element {
    /// Namespace the element name resolves to
    ns: Option<String>,
    /// Local name
    name: String,
    /// Name as written, used in messages
    qname: String,
    /// `(namespace, local name, value)`
    attrs: Vec<(Option<String>, String, String)>,
    /// Prefixes declared on this element and the namespaces they bind
    prefixes: Vec<(String, String)>,
    children: Vec<Element>,
}

impl Element {
    fn in_main(&self) -> bool {
        self.ns.as_deref() == Some(SPREADSHEETML_NS)
    }

    /// A SpreadsheetML element with local name `local`
    fn is(&self, local: &str) -> bool {
        self.in_main() && self.name == local
    }

    /// Unqualified attribute
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(ns, local, _)| ns.is_none() && local == name)
            .map(|(_, _, v)| v.as_str())
    }

    fn attr_ns(&self, ns: &str, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, local, _)| n.as_deref() == Some(ns) && local == name)
            .map(|(_, _, v)| v.as_str())
    }

    fn child(&self, local: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.is(local))
    }

    fn children_named<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.is(local))
    }
}

fn parse_tree(xml: &str) -> Result<Element, String> {
    let mut reader = NsReader::from_str(xml);
    reader.trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let (ns, event) = reader.read_resolved_event().map_err(|e| e.to_string())?;
        let ns = namespace_of(ns)?;
        match event {
            Event::Start(e) => stack.push(element_from(&reader, ns, &e)?),
            Event::Empty(e) => {
                let element = element_from(&reader, ns, &e)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Event::End(_) => {
                let element = stack.pop().ok_or("unbalanced end tag")?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Event::Text(e) => {
                let text = e.unescape().map_err(|err| err.to_string())?;
                check_chars(&text)?;
            }
            Event::CData(e) => check_chars(&String::from_utf8_lossy(&e))?,
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err("unexpected end of document".to_string());
    }
    root.ok_or_else(|| "document has no root element".to_string())
}

fn namespace_of(ns: ResolveResult<'_>) -> Result<Option<String>, String> {
    match ns {
        ResolveResult::Bound(Namespace(uri)) => Ok(Some(String::from_utf8_lossy(uri).into_owned())),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(format!(
            "namespace prefix '{}' is not declared",
            String::from_utf8_lossy(&prefix)
        )),
    }
}

/// Raw or character-referenced text may still hold characters XML forbids
fn check_chars(text: &str) -> Result<(), String> {
    match text.chars().find(|c| !is_xml_char(*c)) {
        Some(c) => Err(format!("character U+{:04X} is not allowed in XML", c as u32)),
        None => Ok(()),
    }
}

fn element_from(
    reader: &NsReader<&[u8]>,
    ns: Option<String>,
    e: &BytesStart<'_>,
) -> Result<Element, String> {
    let mut attrs = Vec::new();
    let mut prefixes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| err.to_string())?;
        let value = attr.unescape_value().map_err(|err| err.to_string())?;
        check_chars(&value)?;
        let key = attr.key.as_ref();
        if key == b"xmlns" {
            continue;
        }
        if let Some(prefix) = key.strip_prefix(b"xmlns:") {
            prefixes.push((
                String::from_utf8_lossy(prefix).into_owned(),
                value.into_owned(),
            ));
            continue;
        }
        // `xml:` is bound by definition and never declared.
        let (attr_ns, local) = match key.strip_prefix(b"xml:") {
            Some(local) => (
                Some(XML_NS.to_string()),
                String::from_utf8_lossy(local).into_owned(),
            ),
            None => {
                let (attr_ns, local) = reader.resolve_attribute(attr.key);
                (
                    namespace_of(attr_ns)?,
                    String::from_utf8_lossy(local.as_ref()).into_owned(),
                )
            }
        };
        attrs.push((attr_ns, local, value.into_owned()));
    }
    Ok(Element {
        ns,
        name: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
        qname: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
        attrs,
        prefixes,
        children: Vec::new(),
    })
}

// ==================== Checker ====================

struct Checker {
    part: String,
    ignorable: HashSet<String>,
    violations: Vec<SchemaViolation>,
}

impl Checker {
    fn new(part: &str) -> Self {
        Self {
            part: part.to_string(),
            ignorable: HashSet::new(),
            violations: Vec::new(),
        }
    }

    fn report<M: Into<String>>(&mut self, path: &str, message: M) {
        self.violations.push(SchemaViolation {
            part: self.part.clone(),
            path: path.to_string(),
            message: message.into(),
        });
    }

    fn finish(self) -> ValidationReport {
        ValidationReport {
            violations: self.violations,
        }
    }

    /// Check the root element name and namespace, and collect the
    /// namespaces declared ignorable.
    fn check_root(&mut self, root: &Element, expected: &str) -> bool {
        if root.name != expected {
            self.report(&root.qname, format!("root element must be <{}>", expected));
            return false;
        }
        if !root.in_main() {
            self.report(expected, "root element is not in the SpreadsheetML namespace");
            return false;
        }
        if let Some(list) = root.attr_ns(MC_NS, "Ignorable") {
            for prefix in list.split_whitespace() {
                match root.prefixes.iter().find(|(p, _)| p == prefix) {
                    Some((_, uri)) => {
                        self.ignorable.insert(uri.clone());
                    }
                    None => self.report(
                        expected,
                        format!("ignorable prefix '{}' is not declared", prefix),
                    ),
                }
            }
        }
        true
    }

    fn is_ignorable(&self, element: &Element) -> bool {
        match element.ns.as_deref() {
            Some(MC_NS) => true,
            Some(ns) => self.ignorable.contains(ns),
            None => false,
        }
    }

    /// SpreadsheetML children of `element`; foreign children that may not be
    /// ignored are reported.
    fn main_children<'e>(&mut self, path: &str, element: &'e Element) -> Vec<&'e Element> {
        let mut children = Vec::new();
        for child in &element.children {
            if child.in_main() {
                children.push(child);
            } else if !self.is_ignorable(child) {
                self.report(path, format!("unexpected element <{}>", child.qname));
            }
        }
        children
    }

    /// Check that children follow `sequence` (name, repeatable), in order.
    fn check_sequence(&mut self, path: &str, element: &Element, sequence: &[(&str, bool)]) {
        let mut last: Option<usize> = None;
        for child in self.main_children(path, element) {
            let name = child.name.as_str();
            let Some(pos) = sequence.iter().position(|(n, _)| *n == name) else {
                self.report(path, format!("unexpected element <{}>", child.qname));
                continue;
            };
            match last {
                Some(prev) if pos < prev => self.report(
                    path,
                    format!("<{}> must precede <{}>", name, sequence[prev].0),
                ),
                Some(prev) if pos == prev && !sequence[pos].1 => {
                    self.report(path, format!("duplicate <{}>", name))
                }
                _ => last = Some(pos),
            }
        }
    }

    /// Check a `count` attribute against the number of `item` children
    fn check_count(&mut self, path: &str, element: &Element, item: &str) {
        let actual = element.children_named(item).count();
        if let Some(value) = element.attr("count") {
            match value.parse::<usize>() {
                Ok(count) if count == actual => {}
                Ok(count) => self.report(
                    path,
                    format!("count=\"{}\" but {} <{}> entries present", count, actual, item),
                ),
                Err(_) => self.report(path, format!("count=\"{}\" is not an unsigned integer", value)),
            }
        }
        for child in self.main_children(path, element) {
            if child.name != item {
                self.report(path, format!("unexpected element <{}>", child.qname));
            }
        }
    }

    fn check_bool_attr(&mut self, path: &str, element: &Element, name: &str) {
        if let Some(value) = element.attr(name) {
            if !matches!(value, "0" | "1" | "true" | "false") {
                self.report(path, format!("{}=\"{}\" is not a boolean", name, value));
            }
        }
    }

    fn check_enum_attr(&mut self, path: &str, element: &Element, name: &str, allowed: &[&str]) {
        if let Some(value) = element.attr(name) {
            if !allowed.contains(&value) {
                self.report(path, format!("{}=\"{}\" is not an allowed value", name, value));
            }
        }
    }

    fn uint_attr(&mut self, path: &str, element: &Element, name: &str, required: bool) -> Option<u32> {
        match element.attr(name) {
            Some(value) => match value.parse::<u32>() {
                Ok(n) => Some(n),
                Err(_) => {
                    self.report(path, format!("{}=\"{}\" is not an unsigned integer", name, value));
                    None
                }
            },
            None => {
                if required {
                    self.report(path, format!("missing required attribute {}", name));
                }
                None
            }
        }
    }

    fn check_double_attr(&mut self, path: &str, element: &Element, name: &str, required: bool) {
        match element.attr(name) {
            Some(value) if value.parse::<f64>().is_err() => {
                self.report(path, format!("{}=\"{}\" is not a number", name, value))
            }
            None if required => self.report(path, format!("missing required attribute {}", name)),
            _ => {}
        }
    }

    fn check_index(&mut self, path: &str, attr: &str, index: Option<u32>, len: usize, what: &str) {
        if let Some(index) = index {
            if index as usize >= len {
                self.report(
                    path,
                    format!("{}={} references {} {} but only {} exist", attr, index, what, index, len),
                );
            }
        }
    }
}

// ==================== styles.xml ====================

const STYLESHEET_SEQUENCE: &[(&str, bool)] = &[
    ("numFmts", false),
    ("fonts", false),
    ("fills", false),
    ("borders", false),
    ("cellStyleXfs", false),
    ("cellXfs", false),
    ("cellStyles", false),
    ("dxfs", false),
    ("tableStyles", false),
    ("colors", false),
    ("extLst", false),
];

const FONT_CHILDREN: &[&str] = &[
    "b", "i", "strike", "condense", "extend", "outline", "shadow", "u", "vertAlign", "sz",
    "color", "name", "family", "charset", "scheme",
];

const BOOLEAN_FONT_PROPERTIES: &[&str] = &[
    "b", "i", "strike", "condense", "extend", "outline", "shadow",
];

const PATTERN_TYPES: &[&str] = &[
    "none", "solid", "mediumGray", "darkGray", "lightGray", "darkHorizontal", "darkVertical",
    "darkDown", "darkUp", "darkGrid", "darkTrellis", "lightHorizontal", "lightVertical",
    "lightDown", "lightUp", "lightGrid", "lightTrellis", "gray125", "gray0625",
];

const BORDER_SEQUENCE: &[(&str, bool)] = &[
    ("start", false),
    ("end", false),
    ("left", false),
    ("right", false),
    ("top", false),
    ("bottom", false),
    ("diagonal", false),
    ("vertical", false),
    ("horizontal", false),
];

const BORDER_STYLES: &[&str] = &[
    "none", "thin", "medium", "dashed", "dotted", "thick", "double", "hair", "mediumDashed",
    "dashDot", "mediumDashDot", "dashDotDot", "mediumDashDotDot", "slantDashDot",
];

const XF_SEQUENCE: &[(&str, bool)] = &[("alignment", false), ("protection", false), ("extLst", false)];

const XF_APPLY_FLAGS: &[&str] = &[
    "applyNumberFormat",
    "applyFont",
    "applyFill",
    "applyBorder",
    "applyAlignment",
    "applyProtection",
    "quotePrefix",
    "pivotButton",
];

const HORIZONTAL_ALIGNMENTS: &[&str] = &[
    "general", "left", "center", "right", "fill", "justify", "centerContinuous", "distributed",
];

const VERTICAL_ALIGNMENTS: &[&str] = &["top", "center", "bottom", "justify", "distributed"];

/// Catalogue sizes the format entries are checked against
struct StyleBounds {
    fonts: usize,
    fills: usize,
    borders: usize,
    cell_style_formats: usize,
    number_formats: HashSet<u32>,
}

impl StyleBounds {
    fn of(root: &Element) -> Self {
        let len = |section: &str, item: &str| {
            root.child(section)
                .map_or(0, |s| s.children_named(item).count())
        };
        let number_formats = root
            .child("numFmts")
            .map(|s| {
                s.children_named("numFmt")
                    .filter_map(|f| f.attr("numFmtId")?.parse().ok())
                    .collect()
            })
            .unwrap_or_default();
        Self {
            fonts: len("fonts", "font"),
            fills: len("fills", "fill"),
            borders: len("borders", "border"),
            cell_style_formats: len("cellStyleXfs", "xf"),
            number_formats,
        }
    }
}

fn check_stylesheet(c: &mut Checker, root: &Element) {
    if !c.check_root(root, "styleSheet") {
        return;
    }
    c.check_sequence("styleSheet", root, STYLESHEET_SEQUENCE);

    for required in ["fonts", "fills", "borders", "cellXfs"] {
        if root.child(required).is_none() {
            c.report("styleSheet", format!("missing required <{}>", required));
        }
    }

    let bounds = StyleBounds::of(root);

    if let Some(num_fmts) = root.child("numFmts") {
        c.check_count("styleSheet/numFmts", num_fmts, "numFmt");
        for (i, fmt) in num_fmts.children_named("numFmt").enumerate() {
            let path = format!("styleSheet/numFmts/numFmt[{}]", i);
            c.uint_attr(&path, fmt, "numFmtId", true);
            if fmt.attr("formatCode").is_none() {
                c.report(&path, "missing required attribute formatCode");
            }
        }
    }

    if let Some(fonts) = root.child("fonts") {
        c.check_count("styleSheet/fonts", fonts, "font");
        if bounds.fonts == 0 {
            c.report("styleSheet/fonts", "at least one <font> is required");
        }
        for (i, font) in fonts.children_named("font").enumerate() {
            check_font(c, &format!("styleSheet/fonts/font[{}]", i), font);
        }
    }

    if let Some(fills) = root.child("fills") {
        c.check_count("styleSheet/fills", fills, "fill");
        for (i, fill) in fills.children_named("fill").enumerate() {
            check_fill(c, &format!("styleSheet/fills/fill[{}]", i), fill);
        }
    }

    if let Some(borders) = root.child("borders") {
        c.check_count("styleSheet/borders", borders, "border");
        for (i, border) in borders.children_named("border").enumerate() {
            check_border(c, &format!("styleSheet/borders/border[{}]", i), border);
        }
    }

    if let Some(xfs) = root.child("cellStyleXfs") {
        c.check_count("styleSheet/cellStyleXfs", xfs, "xf");
        for (i, xf) in xfs.children_named("xf").enumerate() {
            check_xf(c, &format!("styleSheet/cellStyleXfs/xf[{}]", i), xf, &bounds, false);
        }
    }

    if let Some(xfs) = root.child("cellXfs") {
        c.check_count("styleSheet/cellXfs", xfs, "xf");
        if xfs.children_named("xf").next().is_none() {
            c.report("styleSheet/cellXfs", "at least one <xf> is required");
        }
        for (i, xf) in xfs.children_named("xf").enumerate() {
            check_xf(c, &format!("styleSheet/cellXfs/xf[{}]", i), xf, &bounds, true);
        }
    }

    if let Some(styles) = root.child("cellStyles") {
        c.check_count("styleSheet/cellStyles", styles, "cellStyle");
        for (i, style) in styles.children_named("cellStyle").enumerate() {
            let path = format!("styleSheet/cellStyles/cellStyle[{}]", i);
            if style.attr("name").is_none() {
                c.report(&path, "missing required attribute name");
            }
            let xf_id = c.uint_attr(&path, style, "xfId", true);
            c.check_index(&path, "xfId", xf_id, bounds.cell_style_formats, "cellStyleXfs entry");
            c.uint_attr(&path, style, "builtinId", false);
        }
    }

    if let Some(dxfs) = root.child("dxfs") {
        c.check_count("styleSheet/dxfs", dxfs, "dxf");
    }
    if let Some(table_styles) = root.child("tableStyles") {
        c.check_count("styleSheet/tableStyles", table_styles, "tableStyle");
    }
}

fn check_color(c: &mut Checker, path: &str, color: &Element) {
    c.check_bool_attr(path, color, "auto");
    c.uint_attr(path, color, "indexed", false);
    c.uint_attr(path, color, "theme", false);
    c.check_double_attr(path, color, "tint", false);
    if let Some(rgb) = color.attr("rgb") {
        if rgb.len() != 8 || !rgb.chars().all(|ch| ch.is_ascii_hexdigit()) {
            c.report(path, format!("rgb=\"{}\" is not an ARGB hex value", rgb));
        }
    }
}

fn check_font(c: &mut Checker, path: &str, font: &Element) {
    let mut seen = HashSet::new();
    for child in c.main_children(path, font) {
        let name = child.name.as_str();
        if !FONT_CHILDREN.contains(&name) {
            c.report(path, format!("unexpected element <{}>", child.qname));
            continue;
        }
        if !seen.insert(name) {
            c.report(path, format!("duplicate <{}>", name));
        }
        let child_path = format!("{}/{}", path, name);
        match name {
            "sz" => c.check_double_attr(&child_path, child, "val", true),
            "name" => {
                if child.attr("val").is_none() {
                    c.report(&child_path, "missing required attribute val");
                }
            }
            "family" | "charset" => {
                c.uint_attr(&child_path, child, "val", true);
            }
            "scheme" => {
                if child.attr("val").is_none() {
                    c.report(&child_path, "missing required attribute val");
                }
                c.check_enum_attr(&child_path, child, "val", &["none", "major", "minor"]);
            }
            "u" => c.check_enum_attr(
                &child_path,
                child,
                "val",
                &["single", "double", "singleAccounting", "doubleAccounting", "none"],
            ),
            "vertAlign" => {
                c.check_enum_attr(&child_path, child, "val", &["baseline", "superscript", "subscript"])
            }
            "color" => check_color(c, &child_path, child),
            n if BOOLEAN_FONT_PROPERTIES.contains(&n) => c.check_bool_attr(&child_path, child, "val"),
            _ => {}
        }
    }
}

fn check_fill(c: &mut Checker, path: &str, fill: &Element) {
    let kinds = c.main_children(path, fill);
    if kinds.len() != 1 {
        c.report(path, "a fill must hold exactly one <patternFill> or <gradientFill>");
    }
    for kind in kinds {
        match kind.name.as_str() {
            "patternFill" => {
                let child_path = format!("{}/patternFill", path);
                c.check_enum_attr(&child_path, kind, "patternType", PATTERN_TYPES);
                c.check_sequence(&child_path, kind, &[("fgColor", false), ("bgColor", false)]);
                for color in kind.children.iter().filter(|ch| ch.in_main()) {
                    check_color(c, &format!("{}/{}", child_path, color.name), color);
                }
            }
            "gradientFill" => {}
            _ => c.report(path, format!("unexpected element <{}>", kind.qname)),
        }
    }
}

fn check_border(c: &mut Checker, path: &str, border: &Element) {
    c.check_bool_attr(path, border, "diagonalUp");
    c.check_bool_attr(path, border, "diagonalDown");
    c.check_bool_attr(path, border, "outline");
    c.check_sequence(path, border, BORDER_SEQUENCE);
    for edge in border.children.iter().filter(|e| e.in_main()) {
        let edge_path = format!("{}/{}", path, edge.name);
        c.check_enum_attr(&edge_path, edge, "style", BORDER_STYLES);
        for child in c.main_children(&edge_path, edge) {
            if child.name == "color" {
                check_color(c, &format!("{}/color", edge_path), child);
            } else {
                c.report(&edge_path, format!("unexpected element <{}>", child.qname));
            }
        }
    }
}

fn check_xf(c: &mut Checker, path: &str, xf: &Element, bounds: &StyleBounds, is_cell_xf: bool) {
    let font_id = c.uint_attr(path, xf, "fontId", false);
    let fill_id = c.uint_attr(path, xf, "fillId", false);
    let border_id = c.uint_attr(path, xf, "borderId", false);
    let num_fmt_id = c.uint_attr(path, xf, "numFmtId", false);
    let xf_id = c.uint_attr(path, xf, "xfId", false);

    c.check_index(path, "fontId", font_id, bounds.fonts, "font");
    c.check_index(path, "fillId", fill_id, bounds.fills, "fill");
    c.check_index(path, "borderId", border_id, bounds.borders, "border");
    if is_cell_xf {
        c.check_index(path, "xfId", xf_id, bounds.cell_style_formats, "cellStyleXfs entry");
    }
    if let Some(id) = num_fmt_id {
        if !NumberFormat::is_builtin_id(id) && !bounds.number_formats.contains(&id) {
            c.report(path, format!("numFmtId={} is neither built in nor declared", id));
        }
    }

    for flag in XF_APPLY_FLAGS {
        c.check_bool_attr(path, xf, flag);
    }

    c.check_sequence(path, xf, XF_SEQUENCE);
    if let Some(alignment) = xf.child("alignment") {
        let child_path = format!("{}/alignment", path);
        c.check_enum_attr(&child_path, alignment, "horizontal", HORIZONTAL_ALIGNMENTS);
        c.check_enum_attr(&child_path, alignment, "vertical", VERTICAL_ALIGNMENTS);
        c.check_bool_attr(&child_path, alignment, "wrapText");
        c.check_bool_attr(&child_path, alignment, "shrinkToFit");
    }
}

// ==================== workbook.xml ====================

fn check_workbook(c: &mut Checker, root: &Element) {
    if !c.check_root(root, "workbook") {
        return;
    }
    let Some(sheets) = root.child("sheets") else {
        c.report("workbook", "missing required <sheets>");
        return;
    };
    if sheets.children_named("sheet").next().is_none() {
        c.report("workbook/sheets", "at least one <sheet> is required");
    }

    let mut names = HashSet::new();
    let mut ids = HashSet::new();
    for (i, sheet) in c.main_children("workbook/sheets", sheets).into_iter().enumerate() {
        let path = format!("workbook/sheets/sheet[{}]", i);
        if sheet.name != "sheet" {
            c.report("workbook/sheets", format!("unexpected element <{}>", sheet.qname));
            continue;
        }
        match sheet.attr("name") {
            Some(name) => {
                if !names.insert(name.to_lowercase()) {
                    c.report(&path, format!("duplicate sheet name '{}'", name));
                }
            }
            None => c.report(&path, "missing required attribute name"),
        }
        if let Some(id) = c.uint_attr(&path, sheet, "sheetId", true) {
            if !ids.insert(id) {
                c.report(&path, format!("duplicate sheetId {}", id));
            }
        }
        if sheet.attr_ns(RELATIONSHIPS_NS, "id").is_none() {
            c.report(&path, "missing required attribute r:id");
        }
    }
}

// ==================== worksheets ====================

const WORKSHEET_SEQUENCE: &[(&str, bool)] = &[
    ("sheetPr", false),
    ("dimension", false),
    ("sheetViews", false),
    ("sheetFormatPr", false),
    ("cols", true),
    ("sheetData", false),
    ("sheetCalcPr", false),
    ("sheetProtection", false),
    ("protectedRanges", false),
    ("scenarios", false),
    ("autoFilter", false),
    ("sortState", false),
    ("dataConsolidate", false),
    ("customSheetViews", false),
    ("mergeCells", false),
    ("phoneticPr", false),
    ("conditionalFormatting", true),
    ("dataValidations", false),
    ("hyperlinks", false),
    ("printOptions", false),
    ("pageMargins", false),
    ("pageSetup", false),
    ("headerFooter", false),
    ("rowBreaks", false),
    ("colBreaks", false),
    ("customProperties", false),
    ("cellWatches", false),
    ("ignoredErrors", false),
    ("smartTags", false),
    ("drawing", false),
    ("legacyDrawing", false),
    ("legacyDrawingHF", false),
    ("drawingHF", false),
    ("picture", false),
    ("oleObjects", false),
    ("controls", false),
    ("webPublishItems", false),
    ("tableParts", false),
    ("extLst", false),
];

const CELL_TYPES: &[&str] = &["b", "d", "e", "inlineStr", "n", "s", "str"];

const CELL_SEQUENCE: &[(&str, bool)] = &[("f", false), ("v", false), ("is", false), ("extLst", false)];

fn check_worksheet(c: &mut Checker, root: &Element, cell_format_count: usize) {
    if !c.check_root(root, "worksheet") {
        return;
    }
    c.check_sequence("worksheet", root, WORKSHEET_SEQUENCE);
    let Some(sheet_data) = root.child("sheetData") else {
        c.report("worksheet", "missing required <sheetData>");
        return;
    };

    let mut last_row = 0u32;
    for (i, row) in c.main_children("worksheet/sheetData", sheet_data).into_iter().enumerate() {
        let path = format!("worksheet/sheetData/row[{}]", i);
        if row.name != "row" {
            c.report("worksheet/sheetData", format!("unexpected element <{}>", row.qname));
            continue;
        }
        let row_number = match c.uint_attr(&path, row, "r", false) {
            Some(r) => {
                if r == 0 || r <= last_row {
                    c.report(&path, format!("row r={} is not ascending", r));
                }
                r
            }
            None => last_row + 1,
        };
        last_row = row_number.max(last_row);

        let mut last_col: Option<u16> = None;
        for (j, cell) in c.main_children(&path, row).into_iter().enumerate() {
            let cell_path = format!("{}/c[{}]", path, j);
            if cell.name != "c" {
                c.report(&path, format!("unexpected element <{}>", cell.qname));
                continue;
            }
            if let Some(reference) = cell.attr("r") {
                match CellAddress::parse(reference) {
                    Ok(addr) => {
                        if addr.row + 1 != row_number {
                            c.report(
                                &cell_path,
                                format!("r=\"{}\" is outside row {}", reference, row_number),
                            );
                        }
                        if last_col.is_some_and(|prev| addr.col <= prev) {
                            c.report(&cell_path, format!("r=\"{}\" is not ascending", reference));
                        }
                        last_col = Some(addr.col);
                    }
                    Err(_) => c.report(&cell_path, format!("r=\"{}\" is not a cell reference", reference)),
                }
            }

            let style = c.uint_attr(&cell_path, cell, "s", false);
            c.check_index(&cell_path, "s", style, cell_format_count, "cellXfs entry");

            c.check_enum_attr(&cell_path, cell, "t", CELL_TYPES);
            c.check_sequence(&cell_path, cell, CELL_SEQUENCE);
            let inline = cell.attr("t") == Some("inlineStr");
            let has_is = cell.child("is").is_some();
            if inline && !has_is && cell.child("v").is_some() {
                c.report(&cell_path, "inline string cell stores its text in <v> instead of <is>");
            }
            if !inline && has_is {
                c.report(&cell_path, "<is> is only allowed in inline string cells");
            }
        }
    }
}

// ==================== Entry points ====================

/// Checks serialized parts against the SpreadsheetML schema
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    /// Create a validator
    pub fn new() -> Self {
        Self
    }

    /// Validate a style part in the form it will be written
    pub fn validate_stylesheet(&self, stylesheet: &Stylesheet) -> ValidationReport {
        match stylesheet.markup() {
            Some(markup) => self.validate_styles_xml(markup),
            None => self.validate_styles_xml(&write_styles_xml(stylesheet.table())),
        }
    }

    /// Validate `styles.xml` markup
    pub fn validate_styles_xml(&self, xml: &str) -> ValidationReport {
        self.run(STYLES_PART, xml, check_stylesheet)
    }

    /// Validate `workbook.xml` markup
    pub fn validate_workbook_xml(&self, xml: &str) -> ValidationReport {
        self.run(WORKBOOK_PART, xml, check_workbook)
    }

    /// Validate a worksheet part; `s` attributes are checked against
    /// `cell_format_count`
    pub fn validate_worksheet_xml(
        &self,
        part: &str,
        xml: &str,
        cell_format_count: usize,
    ) -> ValidationReport {
        self.run(part, xml, |c, root| check_worksheet(c, root, cell_format_count))
    }

    /// Validate every SpreadsheetML part of a rendered package
    pub fn validate_parts(&self, parts: &[RenderedPart], cell_format_count: usize) -> ValidationReport {
        let mut report = ValidationReport::new();
        for part in parts {
            let part_report = match part.kind {
                Some(PartKind::Styles) => self.run(&part.name, &part.xml, check_stylesheet),
                Some(PartKind::Workbook) => self.run(&part.name, &part.xml, check_workbook),
                Some(PartKind::Worksheet { .. }) => {
                    self.validate_worksheet_xml(&part.name, &part.xml, cell_format_count)
                }
                _ => continue,
            };
            report.merge(part_report);
        }
        report
    }

    fn run<F>(&self, part: &str, xml: &str, check: F) -> ValidationReport
    where
        F: FnOnce(&mut Checker, &Element),
    {
        let mut checker = Checker::new(part);
        match parse_tree(xml) {
            Ok(root) => check(&mut checker, &root),
            Err(e) => checker.report("", format!("not well-formed XML: {}", e)),
        }
        checker.finish()
    }
}
