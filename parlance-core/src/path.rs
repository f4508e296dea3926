//! Path templates for endpoint descriptors.

use std::collections::{BTreeMap, BTreeSet};

use crate::{Error, UrlBuilder};

#[derive(Debug, Clone)]
enum Segment {
    Fixed(String),
    Variable(String),
}

/// An ordered sequence of fixed and variable path segments.
///
/// Built once per endpoint and immutable afterwards. Variable names are
/// unique across a template; every variable must be supplied at render
/// time.
///
/// ```
/// use std::collections::BTreeMap;
/// use parlance_core::{PathTemplate, UrlBuilder};
///
/// let template = PathTemplate::builder()
///     .fixed("widgets")
///     .variable("widgetId")
///     .build();
///
/// let mut url = UrlBuilder::new("https", "example.com", 443);
/// let mut params = BTreeMap::new();
/// params.insert("widgetId".to_string(), "w-1".to_string());
/// template.fill(&params, &mut url).unwrap();
/// assert_eq!(url.build(), "https://example.com/widgets/w-1");
/// ```
#[derive(Debug, Clone)]
pub struct PathTemplate {
    segments: Vec<Segment>,
}

impl PathTemplate {
    pub fn builder() -> PathTemplateBuilder {
        PathTemplateBuilder::default()
    }

    /// Append this template's segments to `url` in template order,
    /// substituting variables from `params`.
    pub fn fill(
        &self,
        params: &BTreeMap<String, String>,
        url: &mut UrlBuilder,
    ) -> Result<(), Error> {
        for segment in &self.segments {
            match segment {
                Segment::Fixed(literal) => {
                    url.path_segment(literal);
                }
                Segment::Variable(name) => {
                    let value = params.get(name).ok_or_else(|| {
                        Error::precondition(format!("No value provided for path parameter {name}"))
                    })?;
                    url.path_segment(value);
                }
            }
        }
        Ok(())
    }
}

/// Builder for [`PathTemplate`].
#[derive(Debug, Default)]
pub struct PathTemplateBuilder {
    segments: Vec<Segment>,
    variable_names: BTreeSet<String>,
}

impl PathTemplateBuilder {
    /// Append a fixed segment rendered literally.
    pub fn fixed(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(Segment::Fixed(segment.into()));
        self
    }

    /// Append a variable segment substituted at render time.
    ///
    /// # Panics
    ///
    /// Panics if `name` was already used by another variable segment;
    /// templates are static definitions, so a duplicate is a programming
    /// error in the endpoint.
    pub fn variable(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        assert!(
            self.variable_names.insert(name.clone()),
            "duplicate path template variable: {name}"
        );
        self.segments.push(Segment::Variable(name));
        self
    }

    pub fn build(self) -> PathTemplate {
        PathTemplate {
            segments: self.segments,
        }
    }
}
