//! Data-flow listing parsers.

use sdmx_model::{Catalog, CatalogEntry};
use sdmx_registry::CatalogDialect;
use tracing::{debug, warn};

use crate::error::Result;
use crate::xml::{
    COMMON_21, Element, MESSAGE_20, NamePicker, Node, STRUCTURE_20, STRUCTURE_21, SdmxReader,
    TextBuffer,
};

/// Qualified names of the elements a catalog dialect is read from.
struct CatalogTags {
    container: (&'static str, &'static str),
    flow: (&'static str, &'static str),
    name: (&'static str, &'static str),
}

impl CatalogTags {
    fn for_dialect(dialect: CatalogDialect) -> Self {
        match dialect {
            CatalogDialect::Sdmx21 => Self {
                container: (STRUCTURE_21, "Dataflows"),
                flow: (STRUCTURE_21, "Dataflow"),
                name: (COMMON_21, "Name"),
            },
            CatalogDialect::KeyFamilies20 => Self {
                container: (MESSAGE_20, "KeyFamilies"),
                flow: (STRUCTURE_20, "KeyFamily"),
                name: (STRUCTURE_20, "Name"),
            },
            CatalogDialect::Dataflows20 => Self {
                container: (MESSAGE_20, "Dataflows"),
                flow: (STRUCTURE_20, "Dataflow"),
                name: (STRUCTURE_20, "Name"),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Scope {
    Container,
    Flow,
    Name(Option<String>),
    Structure,
    KeyFamilyRef,
    KeyFamilyId,
    Annotations,
    Annotation,
    AnnotationText,
    Other,
}

/// Parses a data-flow listing into a catalog.
///
/// Display names prefer `language`; structure references and the
/// `label:count` series-count annotation are picked up when present.
/// Duplicate identifiers keep the last entry.
pub fn parse_catalog(bytes: &[u8], dialect: CatalogDialect, language: &str) -> Result<Catalog> {
    let tags = CatalogTags::for_dialect(dialect);
    let mut reader = SdmxReader::new(bytes);
    let mut stack: Vec<Scope> = Vec::new();
    let mut text = TextBuffer::default();
    let mut names = NamePicker::new(language);
    let mut entry: Option<CatalogEntry> = None;
    let mut catalog = Catalog::new();

    while let Some(node) = reader.next_node()? {
        match node {
            Node::Start(element) => {
                let scope = classify(&tags, &element, stack.last());
                match &scope {
                    Scope::Flow => {
                        let mut flow = CatalogEntry::new(element.required_attr("id")?);
                        flow.agency = element.attr("agencyID").map(str::to_string);
                        entry = Some(flow);
                    }
                    Scope::Name(_) | Scope::KeyFamilyId | Scope::AnnotationText => text.start(),
                    Scope::Other if stack.last() == Some(&Scope::Structure) => {
                        if let (Some(flow), "Ref") = (entry.as_mut(), element.name.as_str()) {
                            flow.structure = element.attr("id").map(str::to_string);
                        }
                    }
                    _ => {}
                }
                stack.push(scope);
            }
            Node::Text(chunk) => text.push(&chunk),
            Node::End => match stack.pop() {
                Some(Scope::Flow) => {
                    if let Some(mut flow) = entry.take() {
                        flow.name = names.take();
                        if flow.name.is_none() {
                            warn!(flow = %flow.id, "Dataflow has no name");
                        }
                        catalog.insert(flow);
                    }
                }
                Some(Scope::Name(lang)) => names.offer(lang.as_deref(), text.take()),
                Some(Scope::KeyFamilyId) => {
                    let structure = text.take();
                    if let Some(flow) = entry.as_mut().filter(|_| !structure.is_empty()) {
                        flow.structure = Some(structure);
                    }
                }
                Some(Scope::AnnotationText) => {
                    let count = series_count(&text.take());
                    if let (Some(flow), Some(count)) = (entry.as_mut(), count) {
                        flow.series_count = Some(count);
                    }
                }
                _ => {}
            },
        }
    }

    debug!(flows = catalog.len(), "Parsed catalog");
    Ok(catalog)
}

fn classify(tags: &CatalogTags, element: &Element, parent: Option<&Scope>) -> Scope {
    let is = |(namespace, name): (&str, &str)| element.is(namespace, name);
    match parent {
        _ if is(tags.container) => Scope::Container,
        Some(Scope::Container) if is(tags.flow) => Scope::Flow,
        Some(Scope::Flow) if is(tags.name) => Scope::Name(element.lang().map(str::to_string)),
        Some(Scope::Flow) if is((STRUCTURE_21, "Structure")) => Scope::Structure,
        Some(Scope::Flow) if is((STRUCTURE_20, "KeyFamilyRef")) => Scope::KeyFamilyRef,
        Some(Scope::KeyFamilyRef) if is((STRUCTURE_20, "KeyFamilyID")) => Scope::KeyFamilyId,
        Some(Scope::Flow) if is((COMMON_21, "Annotations")) => Scope::Annotations,
        Some(Scope::Annotations) if is((COMMON_21, "Annotation")) => Scope::Annotation,
        Some(Scope::Annotation) if is((COMMON_21, "AnnotationText")) => Scope::AnnotationText,
        _ => Scope::Other,
    }
}

/// Series count from an annotation of the form `label:count`.
fn series_count(text: &str) -> Option<u64> {
    let (_, count) = text.rsplit_once(':')?;
    count.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SDMX21: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<message:Structure xmlns:message="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/message"
    xmlns:structure="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/structure"
    xmlns:common="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/common">
  <message:Structures>
    <structure:Dataflows>
      <structure:Dataflow id="EXR" agencyID="ECB" version="1.0">
        <common:Name xml:lang="fr">Taux de change</common:Name>
        <common:Name xml:lang="en">Exchange Rates</common:Name>
        <structure:Structure><Ref id="ECB_EXR1" agencyID="ECB" class="DataStructure"/></structure:Structure>
      </structure:Dataflow>
      <structure:Dataflow id="CLIMAT-AFFAIRES" agencyID="FR1">
        <common:Annotations>
          <common:Annotation>
            <common:AnnotationText xml:lang="en">Number of series:42</common:AnnotationText>
          </common:Annotation>
        </common:Annotations>
        <common:Name xml:lang="fr">Indicateurs synth&#233;tiques du climat des affaires</common:Name>
      </structure:Dataflow>
    </structure:Dataflows>
  </message:Structures>
</message:Structure>"#;

    #[test]
    fn test_sdmx21_catalog() {
        let catalog = parse_catalog(SDMX21.as_bytes(), CatalogDialect::Sdmx21, "en").unwrap();
        assert_eq!(catalog.len(), 2);

        let exr = catalog.get("exr").unwrap();
        assert_eq!(exr.name.as_deref(), Some("Exchange Rates"));
        assert_eq!(exr.structure.as_deref(), Some("ECB_EXR1"));
        assert_eq!(exr.agency.as_deref(), Some("ECB"));
        assert_eq!(exr.series_count, None);

        let climat = catalog.get("CLIMAT-AFFAIRES").unwrap();
        assert_eq!(climat.series_count, Some(42));
        assert_eq!(
            climat.name.as_deref(),
            Some("Indicateurs synthétiques du climat des affaires")
        );
    }

    #[test]
    fn test_key_families_catalog() {
        let xml = r#"<message:Structure xmlns:message="http://www.SDMX.org/resources/SDMXML/schemas/v2_0/message"
    xmlns="http://www.SDMX.org/resources/SDMXML/schemas/v2_0/structure">
  <message:KeyFamilies>
    <KeyFamily id="QNA" agencyID="OECD">
      <Name xml:lang="en">Quarterly National Accounts</Name>
      <Name xml:lang="fr">Comptes nationaux trimestriels</Name>
    </KeyFamily>
  </message:KeyFamilies>
</message:Structure>"#;
        let catalog = parse_catalog(xml.as_bytes(), CatalogDialect::KeyFamilies20, "en").unwrap();
        assert_eq!(catalog.identifiers(), vec!["QNA"]);
        assert_eq!(
            catalog.get("QNA").and_then(|e| e.name.as_deref()),
            Some("Quarterly National Accounts")
        );
    }

    #[test]
    fn test_dataflows20_catalog() {
        let xml = r#"<Structure xmlns="http://www.SDMX.org/resources/SDMXML/schemas/v2_0/message">
  <Header><ID>DF</ID></Header>
  <Dataflows>
    <Dataflow xmlns="http://www.SDMX.org/resources/SDMXML/schemas/v2_0/structure"
        id="DS-IFS" version="1.0" agencyID="IMF" isFinal="true">
      <Name xml:lang="en">International Financial Statistics (IFS)</Name>
      <KeyFamilyRef>
        <KeyFamilyID>IFS</KeyFamilyID>
        <KeyFamilyAgencyID>IMF</KeyFamilyAgencyID>
      </KeyFamilyRef>
    </Dataflow>
  </Dataflows>
</Structure>"#;
        let catalog = parse_catalog(xml.as_bytes(), CatalogDialect::Dataflows20, "en").unwrap();
        assert_eq!(catalog.identifiers(), vec!["DS-IFS"]);
        let ifs = catalog.get("ds-ifs").unwrap();
        assert_eq!(ifs.structure.as_deref(), Some("IFS"));
        assert_eq!(ifs.agency.as_deref(), Some("IMF"));
        assert_eq!(
            ifs.name.as_deref(),
            Some("International Financial Statistics (IFS)")
        );

        let as_21 = parse_catalog(xml.as_bytes(), CatalogDialect::Sdmx21, "en").unwrap();
        assert!(as_21.is_empty());
    }

    #[test]
    fn test_wrong_dialect_yields_empty_catalog() {
        let catalog = parse_catalog(SDMX21.as_bytes(), CatalogDialect::KeyFamilies20, "en").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_series_count_annotation() {
        assert_eq!(series_count("Number of series:42"), Some(42));
        assert_eq!(series_count("no count here"), None);
        assert_eq!(series_count("label:abc"), None);
    }
}
