//! Code-list parsers for SDMX 2.1, SDMX 2.0 and XML Schema enumerations.

use sdmx_model::CodeListEntry;
use sdmx_registry::CodeListDialect;
use tracing::debug;

use crate::error::Result;
use crate::xml::{
    COMMON_21, Element, NamePicker, Node, STRUCTURE_20, STRUCTURE_21, SdmxReader, TextBuffer,
    XML_SCHEMA,
};

/// Parses a code-list document into one entry per code.
///
/// Names and descriptions prefer `language` and fall back to the first one
/// published.
pub fn parse_code_lists(
    bytes: &[u8],
    dialect: CodeListDialect,
    language: &str,
) -> Result<Vec<CodeListEntry>> {
    let entries = match dialect {
        CodeListDialect::Sdmx21 => parse_structure(bytes, &StructureTags::SDMX21, language)?,
        CodeListDialect::Sdmx20 => parse_structure(bytes, &StructureTags::SDMX20, language)?,
        CodeListDialect::XmlSchema => parse_schema(bytes, language)?,
    };
    debug!(codes = entries.len(), "Parsed code lists");
    Ok(entries)
}

/// Qualified names of a structure-message code-list dialect.
struct StructureTags {
    namespace: &'static str,
    list: &'static str,
    name_namespace: &'static str,
    list_name: &'static str,
    code_id: &'static str,
    code_name: &'static str,
}

impl StructureTags {
    const SDMX21: Self = Self {
        namespace: STRUCTURE_21,
        list: "Codelist",
        name_namespace: COMMON_21,
        list_name: "Name",
        code_id: "id",
        code_name: "Name",
    };

    const SDMX20: Self = Self {
        namespace: STRUCTURE_20,
        list: "CodeList",
        name_namespace: STRUCTURE_20,
        list_name: "Name",
        code_id: "value",
        code_name: "Description",
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Scope {
    List,
    ListName(Option<String>),
    Code,
    CodeName(Option<String>),
    Other,
}

fn parse_structure(
    bytes: &[u8],
    tags: &StructureTags,
    language: &str,
) -> Result<Vec<CodeListEntry>> {
    let mut reader = SdmxReader::new(bytes);
    let mut stack: Vec<Scope> = Vec::new();
    let mut text = TextBuffer::default();
    let mut list_names = NamePicker::new(language);
    let mut code_names = NamePicker::new(language);
    let mut list: Option<CodeListEntry> = None;
    let mut code: Option<String> = None;
    let mut entries = Vec::new();

    while let Some(node) = reader.next_node()? {
        match node {
            Node::Start(element) => {
                let scope = match stack.last() {
                    _ if element.is(tags.namespace, tags.list) => Scope::List,
                    Some(Scope::List) if element.is(tags.name_namespace, tags.list_name) => {
                        Scope::ListName(element.lang().map(str::to_string))
                    }
                    Some(Scope::List) if element.is(tags.namespace, "Code") => Scope::Code,
                    Some(Scope::Code) if element.is(tags.name_namespace, tags.code_name) => {
                        Scope::CodeName(element.lang().map(str::to_string))
                    }
                    _ => Scope::Other,
                };
                match scope {
                    Scope::List => {
                        list = Some(CodeListEntry {
                            codelist_id: element.required_attr("id")?.to_string(),
                            agency: element.attr("agencyID").map(str::to_string),
                            ..CodeListEntry::default()
                        });
                    }
                    Scope::Code => code = Some(element.required_attr(tags.code_id)?.to_string()),
                    Scope::ListName(_) | Scope::CodeName(_) => text.start(),
                    Scope::Other => {}
                }
                stack.push(scope);
            }
            Node::Text(chunk) => text.push(&chunk),
            Node::End => match stack.pop() {
                Some(Scope::ListName(lang)) => list_names.offer(lang.as_deref(), text.take()),
                Some(Scope::CodeName(lang)) => code_names.offer(lang.as_deref(), text.take()),
                Some(Scope::Code) => {
                    if let (Some(list), Some(code)) = (list.as_mut(), code.take()) {
                        // List names precede codes in every published message.
                        if list.codelist_name.is_none() {
                            list.codelist_name = list_names.take();
                        }
                        entries.push(CodeListEntry {
                            code,
                            description: code_names.take(),
                            ..list.clone()
                        });
                    }
                }
                Some(Scope::List) => {
                    list = None;
                    list_names.take();
                }
                _ => {}
            },
        }
    }

    Ok(entries)
}

fn parse_schema(bytes: &[u8], language: &str) -> Result<Vec<CodeListEntry>> {
    let mut reader = SdmxReader::new(bytes);
    let mut stack: Vec<(bool, String)> = Vec::new();
    let mut text = TextBuffer::default();
    let mut descriptions = NamePicker::new(language);
    let mut simple_type: Option<String> = None;
    let mut base: Option<String> = None;
    let mut value: Option<String> = None;
    let mut lang: Option<String> = None;
    let mut entries = Vec::new();

    while let Some(node) = reader.next_node()? {
        match node {
            Node::Start(element) => {
                let in_schema = element.namespace.as_deref() == Some(XML_SCHEMA);
                if in_schema {
                    open_schema_element(
                        &element,
                        &mut simple_type,
                        &mut base,
                        &mut value,
                        &mut lang,
                    );
                    if element.name == "documentation" && value.is_some() {
                        text.start();
                    }
                }
                stack.push((in_schema, element.name));
            }
            Node::Text(chunk) => text.push(&chunk),
            Node::End => {
                let Some((true, name)) = stack.pop() else {
                    continue;
                };
                match name.as_str() {
                    "documentation" if value.is_some() => {
                        descriptions.offer(lang.take().as_deref(), text.take());
                    }
                    "enumeration" => {
                        if let (Some(codelist_id), Some(code)) = (simple_type.as_ref(), value.take())
                        {
                            entries.push(CodeListEntry {
                                codelist_id: codelist_id.clone(),
                                value_type: base.clone(),
                                code,
                                description: descriptions.take(),
                                ..CodeListEntry::default()
                            });
                        }
                    }
                    "restriction" => base = None,
                    "simpleType" => simple_type = None,
                    _ => {}
                }
            }
        }
    }

    Ok(entries)
}

fn open_schema_element(
    element: &Element,
    simple_type: &mut Option<String>,
    base: &mut Option<String>,
    value: &mut Option<String>,
    lang: &mut Option<String>,
) {
    match element.name.as_str() {
        "simpleType" => *simple_type = element.attr("name").map(str::to_string),
        "restriction" => *base = element.attr("base").map(str::to_string),
        "enumeration" => *value = element.attr("value").map(str::to_string),
        "documentation" => *lang = element.lang().map(str::to_string),
        _ => {}
    }
}
