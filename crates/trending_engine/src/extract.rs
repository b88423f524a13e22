use std::collections::{BTreeMap, HashMap};
use std::fmt;

use scraper::{ElementRef, Html, Selector};
use trending_core::{PageSpec, ResolvedLocation};

use crate::error::ExtractionError;
use crate::markup::{absolutize, MarkupWriter};

/// Following siblings kept per element for "the text right after ..." picks.
pub const MAX_FOLLOWING_SIBLINGS: usize = 4;

/// Width cap applied to every embedded image.
const IMAGE_STYLE: &str = "max-width:800px";

/// Element kinds captured from every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Title,
    H2,
    H3,
    H4,
    Paragraph,
    Anchor,
    Table,
    Div,
    Teletype,
    Emphasis,
    Script,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Category::Title,
        Category::H2,
        Category::H3,
        Category::H4,
        Category::Paragraph,
        Category::Anchor,
        Category::Table,
        Category::Div,
        Category::Teletype,
        Category::Emphasis,
        Category::Script,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Category::Title => "title",
            Category::H2 => "h2",
            Category::H3 => "h3",
            Category::H4 => "h4",
            Category::Paragraph => "p",
            Category::Anchor => "a",
            Category::Table => "table",
            Category::Div => "div",
            Category::Teletype => "tt",
            Category::Emphasis => "em",
            Category::Script => "script",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedElement {
    /// Outer markup with link targets already rewritten.
    pub html: String,
    pub text: String,
    /// Markup of the next sibling nodes (text nodes included), nearest first.
    pub following: Vec<String>,
}

/// Structured view of one fetched page. Built once, read by the selector.
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    key: String,
    location: ResolvedLocation,
    elements: HashMap<Category, Vec<ExtractedElement>>,
    images: BTreeMap<String, String>,
    current_images: BTreeMap<String, String>,
}

impl ExtractedPage {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn location(&self) -> &ResolvedLocation {
        &self.location
    }

    pub fn elements(&self, category: Category) -> &[ExtractedElement] {
        self.elements
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn element(&self, category: Category, index: usize) -> Result<&ExtractedElement, ExtractionError> {
        let elements = self.elements(category);
        elements
            .get(index)
            .ok_or_else(|| ExtractionError::MissingElement {
                page: self.key.clone(),
                category,
                index,
                available: elements.len(),
            })
    }

    /// Sibling `depth` steps after the element (`depth` 1 is the next node).
    pub fn following(&self, category: Category, index: usize, depth: usize) -> Result<&str, ExtractionError> {
        let element = self.element(category, index)?;
        depth
            .checked_sub(1)
            .and_then(|offset| element.following.get(offset))
            .map(String::as_str)
            .ok_or_else(|| ExtractionError::MissingSibling {
                page: self.key.clone(),
                category,
                index,
                depth,
            })
    }

    /// Embeddable `<img>` for `name`, pointing below the primary URL.
    pub fn image(&self, name: &str) -> Result<&str, ExtractionError> {
        self.lookup_image(&self.images, name)
    }

    /// Embeddable `<img>` for `name`, pointing below the current-period URL.
    pub fn current_image(&self, name: &str) -> Result<&str, ExtractionError> {
        self.lookup_image(&self.current_images, name)
    }

    pub fn images(&self) -> &BTreeMap<String, String> {
        &self.images
    }

    pub fn current_images(&self) -> &BTreeMap<String, String> {
        &self.current_images
    }

    /// Link back to the page the fragments came from.
    pub fn source_link(&self) -> String {
        let url = html_escape::encode_double_quoted_attribute(self.location.primary());
        format!("<a href=\"{url}\">{url}</a><br>")
    }

    fn lookup_image<'m>(&self, images: &'m BTreeMap<String, String>, name: &str) -> Result<&'m str, ExtractionError> {
        images
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ExtractionError::MissingImage {
                page: self.key.clone(),
                name: name.to_string(),
            })
    }
}

/// Parses a page once and indexes it by [`Category`].
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkupExtractor;

impl MarkupExtractor {
    pub fn extract(
        &self,
        spec: &PageSpec,
        html: &str,
        location: &ResolvedLocation,
    ) -> Result<ExtractedPage, ExtractionError> {
        let doc = Html::parse_document(html);
        let writer = MarkupWriter::new(location.primary(), spec.link_policy());

        let mut elements = HashMap::with_capacity(Category::ALL.len());
        for category in Category::ALL {
            let selector = parse_selector(category.tag())?;
            let found = doc
                .select(&selector)
                .map(|element| extract_element(&writer, element))
                .collect::<Vec<_>>();
            elements.insert(category, found);
        }

        let img = parse_selector("img")?;
        let images = collect_images(&doc, &img, location.primary());
        let current_images = if location.has_distinct_current_period() {
            collect_images(&doc, &img, location.current_period())
        } else {
            images.clone()
        };

        Ok(ExtractedPage {
            key: spec.key().to_string(),
            location: location.clone(),
            elements,
            images,
            current_images,
        })
    }
}

pub(crate) fn parse_selector(css: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(css).map_err(|err| ExtractionError::Selector {
        css: css.to_string(),
        message: err.to_string(),
    })
}

fn extract_element(writer: &MarkupWriter<'_>, element: ElementRef<'_>) -> ExtractedElement {
    ExtractedElement {
        html: writer.write(*element),
        text: element.text().collect::<String>().trim().to_string(),
        following: element
            .next_siblings()
            .take(MAX_FOLLOWING_SIBLINGS)
            .map(|sibling| writer.write(sibling))
            .collect(),
    }
}

/// Plot images only: `.png` and `.gif`, matched case-sensitively on the raw
/// `src`, keyed by that raw value.
fn collect_images(doc: &Html, img: &Selector, base: &str) -> BTreeMap<String, String> {
    doc.select(img)
        .filter_map(|element| element.value().attr("src"))
        .filter(|src| src.ends_with(".png") || src.ends_with(".gif"))
        .map(|src| {
            let url = absolutize(base, src);
            let fragment = format!(
                "<img src=\"{}\" style=\"{IMAGE_STYLE}\">",
                html_escape::encode_double_quoted_attribute(&url)
            );
            (src.to_string(), fragment)
        })
        .collect()
}
