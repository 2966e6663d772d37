//! Help project (`.qhp`) and collection (`.qhcp`) descriptor rendering.
//!
//! Both renderers are pure: same descriptor in, same text out.

use std::fmt::Write as _;

use qhelpkit_shared::{HelpProjectDescriptor, OutputNames};

use crate::toc::render_toc;

/// The two descriptor documents handed to the help compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDescriptors {
    /// Help project text (`help.qhp`).
    pub project: String,
    /// Collection project text (`help.qhcp`).
    pub collection: String,
}

/// Render both descriptors for `descriptor`, naming files per `names`.
pub fn render(descriptor: &HelpProjectDescriptor, names: &OutputNames) -> RenderedDescriptors {
    RenderedDescriptors {
        project: render_project(descriptor),
        collection: render_collection(names),
    }
}

/// Render the help project document.
///
/// Sections appear in fixed order: namespace, virtual folder, custom filter,
/// then a filter section holding the TOC, keywords, and file manifest. Empty
/// keyword or file lists render as empty elements.
pub fn render_project(descriptor: &HelpProjectDescriptor) -> String {
    let mut out = String::new();

    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<QtHelpProject version=\"1.0\">\n");
    let _ = writeln!(out, "    <namespace>{}</namespace>", escape(&descriptor.namespace));
    let _ = writeln!(
        out,
        "    <virtualFolder>{}</virtualFolder>",
        escape(&descriptor.virtual_folder)
    );

    let _ = writeln!(
        out,
        "    <customFilter name=\"{}\">",
        escape(&descriptor.filter_name)
    );
    for attribute in &descriptor.filter_attributes {
        let _ = writeln!(
            out,
            "        <filterAttribute>{}</filterAttribute>",
            escape(attribute)
        );
    }
    out.push_str("    </customFilter>\n");

    out.push_str("    <filterSection>\n");

    out.push_str("        <toc>\n");
    out.push_str(&render_toc(&descriptor.toc, 12));
    out.push_str("        </toc>\n");

    out.push_str("        <keywords>\n");
    for keyword in &descriptor.keywords {
        let _ = writeln!(
            out,
            "            <keyword name=\"{}\" ref=\"{}\"/>",
            escape(&keyword.name),
            escape(&keyword.reference)
        );
    }
    out.push_str("        </keywords>\n");

    out.push_str("        <files>\n");
    for pattern in &descriptor.files {
        let _ = writeln!(out, "            <file>{}</file>", escape(pattern));
    }
    out.push_str("        </files>\n");

    out.push_str("    </filterSection>\n");
    out.push_str("</QtHelpProject>\n");
    out
}

/// Render the collection project that compiles and registers the archive.
pub fn render_collection(names: &OutputNames) -> String {
    let project = escape(&names.project);
    let archive = escape(&names.archive());

    format!(
        r#"<?xml version="1.0" encoding="utf-8" ?>
<QHelpCollectionProject version="1.0">
    <docFiles>
        <generate>
            <file>
                <input>{project}</input>
                <output>{archive}</output>
            </file>
        </generate>
        <register>
            <file>{archive}</file>
        </register>
    </docFiles>
</QHelpCollectionProject>
"#
    )
}

/// Escape text for use in element content or a double-quoted attribute.
pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
