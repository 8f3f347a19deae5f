//! yEd-styled GraphML export.

use std::fmt::Write;

use branchnet_commit::{CommitMap, CommitRecord, short};

use crate::{Color, CommitExporter, Palette};

const GRAPHML_HEADER: &str = r#"<graphml xmlns="http://graphml.graphdrawing.org/xmlns" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:y="http://www.yworks.com/xml/graphml" xmlns:yed="http://www.yworks.com/xml/yed/3" xsi:schemaLocation="http://graphml.graphdrawing.org/xmlns http://www.yworks.com/xml/schema/graphml/1.1/ygraphml.xsd">"#;

/// `(id, attr.name)` of the node attribute keys.
const ATTRIBUTE_KEYS: [(&str, &str); 5] = [
    ("attrAuthor", "author"),
    ("attrComment", "comment"),
    ("attrUrl", "url"),
    ("attrBranch", "branch"),
    ("attrTimestamp", "timestamp"),
];

/// Writes a directed graph: one node per commit, one edge per parent link.
///
/// Node fill color identifies the committer, node border and edge color the
/// branch. Colors are drawn from two [`Palette`]s created per render.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphmlExporter {
    palette_seed: Option<u64>,
}

impl GraphmlExporter {
    /// Creates a new exporter. A seed makes the colors reproducible.
    #[must_use]
    pub fn new(palette_seed: Option<u64>) -> Self {
        Self { palette_seed }
    }

    fn write_node(out: &mut String, record: &CommitRecord, fill: Color, border: Color) {
        _ = write!(
            out,
            concat!(
                r#"<node id="{id}"><data key="nodeStyle"><y:ShapeNode>"#,
                r#"<y:NodeLabel>{label}</y:NodeLabel>"#,
                r#"<y:Shape type="rectangle"/>"#,
                r#"<y:Geometry height="15.0" width="60"/>"#,
                r#"<y:Fill color="{fill}" transparent="false"/>"#,
                r#"<y:BorderStyle color="{border}" type="line" width="3.0"/>"#,
                r#"</y:ShapeNode></data>"#,
            ),
            id = escape(&record.id),
            label = escape(record.short_id()),
            fill = fill,
            border = border,
        );
        write_data(out, "attrAuthor", &record.committer);
        write_data(out, "attrUrl", &record.url);
        write_data(out, "attrBranch", &record.branch);
        write_data(out, "attrTimestamp", &record.display_date());
        write_data(out, "attrComment", &record.message);
        out.push_str("</node>\n");
    }

    fn write_edge(out: &mut String, child: &CommitRecord, parent: &str, color: Color) {
        _ = writeln!(
            out,
            concat!(
                r#"<edge id="{id}" directed="true" source="{source}" target="{target}">"#,
                r#"<data key="edgeStyle"><y:PolyLineEdge>"#,
                r#"<y:LineStyle color="{color}" type="line" width="2.0"/>"#,
                r#"<y:Arrows source="none" target="standard"/>"#,
                r#"</y:PolyLineEdge></data></edge>"#,
            ),
            id = escape(&format!("{}_{}", child.short_id(), short(parent))),
            source = escape(parent),
            target = escape(&child.id),
            color = color,
        );
    }
}

impl CommitExporter for GraphmlExporter {
    fn name(&self) -> &'static str {
        "graphml"
    }

    fn extension(&self) -> &'static str {
        "graphml"
    }

    fn render(&self, commits: &CommitMap) -> String {
        let mut committers = Palette::new(self.palette_seed);
        let mut branches = Palette::new(self.palette_seed.map(|seed| seed.wrapping_add(1)));

        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str(GRAPHML_HEADER);
        out.push('\n');
        out.push_str("<key for=\"node\" id=\"nodeStyle\" yfiles.type=\"nodegraphics\"/>\n");
        out.push_str("<key for=\"edge\" id=\"edgeStyle\" yfiles.type=\"edgegraphics\"/>\n");
        for (id, name) in ATTRIBUTE_KEYS {
            _ = writeln!(
                out,
                r#"<key for="node" id="{id}" attr.name="{name}" attr.type="string"/>"#
            );
        }
        out.push_str("<graph edgedefault=\"directed\">\n");

        for record in commits {
            let border = branches.color_for(&record.branch);
            let fill = committers.color_for(&record.committer);
            Self::write_node(&mut out, record, fill, border);
            for parent in &record.parents {
                Self::write_edge(&mut out, record, parent, border);
            }
        }

        out.push_str("</graph>\n</graphml>\n");
        out
    }
}

fn write_data(out: &mut String, key: &str, value: &str) {
    _ = write!(out, r#"<data key="{key}">{}</data>"#, escape(value));
}

/// Escapes text for use in XML content and attribute values.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\r' => escaped.push_str("&#13;"),
            '\n' => escaped.push_str("&#10;"),
            '\t' => escaped.push_str("&#9;"),
            c if c.is_control() => {}
            c => escaped.push(c),
        }
    }
    escaped
}
