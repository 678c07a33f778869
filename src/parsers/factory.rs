// src/parsers/factory.rs
use super::{FilingParser, Form10QParser, Form13DParser, Form14AParser, Form4Parser, Form8KParser};

/// Resolves a form type to the parser that claims it.
///
/// The parser set is fixed at compile time; lookup is first match in
/// registration order.
#[derive(Clone, Copy)]
pub struct ParserFactory {
    parsers: [&'static dyn FilingParser; 5],
}

impl ParserFactory {
    pub fn new() -> Self {
        Self {
            parsers: [
                &Form8KParser,
                &Form4Parser,
                &Form13DParser,
                &Form10QParser,
                &Form14AParser,
            ],
        }
    }

    /// Returns `None` (and logs a warning) when no parser claims `form_type`.
    /// Unclaimed forms are expected and simply skipped by callers.
    pub fn get_parser(&self, form_type: &str) -> Option<&'static dyn FilingParser> {
        let parser = self.parsers.iter().copied().find(|p| p.can_parse(form_type));
        if parser.is_none() {
            tracing::warn!("No parser found for form type: {}", form_type);
        }
        parser
    }

    /// Every form code with a registered parser, in registration order.
    pub fn supported_forms(&self) -> Vec<&'static str> {
        self.parsers
            .iter()
            .flat_map(|p| p.form_types().iter().map(|f| f.as_str()))
            .collect()
    }
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ParserFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserFactory")
            .field("forms", &self.supported_forms())
            .finish()
    }
}
