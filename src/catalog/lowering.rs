// Fri Oct 16 2026 - Alex

use crate::schema::XmlDocument;

pub const LOWERED_ROOT: &str = "ld:data-definition";

/// One XML to XML rewriting stage applied to every input document before
/// its declarations are read.
pub trait Normalize {
    fn name(&self) -> &str;
    fn normalize(&self, document: XmlDocument) -> Result<XmlDocument, String>;
}

/// Accepts documents that are already in the lowered vocabulary.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoweredPassthrough;

impl Normalize for LoweredPassthrough {
    fn name(&self) -> &str {
        "lowered-passthrough"
    }

    fn normalize(&self, document: XmlDocument) -> Result<XmlDocument, String> {
        Ok(document)
    }
}

/// Rejects documents whose root is not `ld:data-definition`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RootCheck;

impl Normalize for RootCheck {
    fn name(&self) -> &str {
        "root-check"
    }

    fn normalize(&self, document: XmlDocument) -> Result<XmlDocument, String> {
        if document.root.name != LOWERED_ROOT {
            return Err(format!("expected <{}> root, found <{}>", LOWERED_ROOT, document.root.name));
        }
        Ok(document)
    }
}

/// The two sequential stages run over every input file.
pub struct LoweringPipeline {
    first: Box<dyn Normalize>,
    second: Box<dyn Normalize>,
}

impl LoweringPipeline {
    pub fn new(first: Box<dyn Normalize>, second: Box<dyn Normalize>) -> Self {
        Self { first, second }
    }

    pub fn stage_names(&self) -> [&str; 2] {
        [self.first.name(), self.second.name()]
    }
}

impl Default for LoweringPipeline {
    fn default() -> Self {
        Self::new(Box::new(LoweredPassthrough), Box::new(RootCheck))
    }
}

impl Normalize for LoweringPipeline {
    fn name(&self) -> &str {
        "lowering"
    }

    fn normalize(&self, document: XmlDocument) -> Result<XmlDocument, String> {
        let document = self.first.normalize(document)
            .map_err(|e| format!("{}: {}", self.first.name(), e))?;
        self.second.normalize(document)
            .map_err(|e| format!("{}: {}", self.second.name(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::XmlElement;

    struct Rename;

    impl Normalize for Rename {
        fn name(&self) -> &str {
            "rename"
        }

        fn normalize(&self, mut document: XmlDocument) -> Result<XmlDocument, String> {
            document.root.name = LOWERED_ROOT.to_string();
            Ok(document)
        }
    }

    #[test]
    fn test_default_pipeline_accepts_lowered_root() {
        let pipeline = LoweringPipeline::default();
        let doc = XmlDocument::new(XmlElement::new(LOWERED_ROOT));
        assert_eq!(pipeline.normalize(doc.clone()).unwrap(), doc);
        assert_eq!(pipeline.stage_names(), ["lowered-passthrough", "root-check"]);
    }

    #[test]
    fn test_default_pipeline_rejects_raw_root() {
        let pipeline = LoweringPipeline::default();
        let err = pipeline.normalize(XmlDocument::new(XmlElement::new("data-definition"))).unwrap_err();
        assert!(err.starts_with("root-check:"));
    }

    #[test]
    fn test_stages_run_in_order() {
        let pipeline = LoweringPipeline::new(Box::new(Rename), Box::new(RootCheck));
        let doc = pipeline.normalize(XmlDocument::new(XmlElement::new("data-definition"))).unwrap();
        assert_eq!(doc.root.name, LOWERED_ROOT);
    }
}
