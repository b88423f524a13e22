use crate::error::ExtractionError;
use crate::extract::{Category, ExtractedPage};

/// Chooses which parts of an extracted page end up in the report, in order.
///
/// Implementations must not do I/O. A pick that does not exist on the page
/// (ordinal out of range, unknown image) fails the whole page.
pub trait FragmentSelector: Send + Sync {
    fn select(&self, page: &ExtractedPage) -> Result<Vec<String>, ExtractionError>;
}

impl<F> FragmentSelector for F
where
    F: Fn(&ExtractedPage) -> Result<Vec<String>, ExtractionError> + Send + Sync,
{
    fn select(&self, page: &ExtractedPage) -> Result<Vec<String>, ExtractionError> {
        self(page)
    }
}

/// One entry of a declarative selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    /// Markup inserted as-is.
    Markup(&'static str),
    /// The n-th (0-based) element of a category.
    Element(Category, usize),
    /// The sibling node `depth` steps after the n-th element of a category.
    Following(Category, usize, usize),
    /// Image by its `src` filename, below the primary URL.
    Image(&'static str),
    /// Image by its `src` filename, below the current-period URL.
    CurrentImage(&'static str),
    /// Link to the page the fragments were taken from.
    SourceLink,
}

/// A fixed list of [`Pick`]s, evaluated in order.
#[derive(Debug, Clone, Copy)]
pub struct PickList(pub &'static [Pick]);

impl FragmentSelector for PickList {
    fn select(&self, page: &ExtractedPage) -> Result<Vec<String>, ExtractionError> {
        self.0
            .iter()
            .map(|pick| {
                Ok(match *pick {
                    Pick::Markup(markup) => markup.to_string(),
                    Pick::Element(category, index) => page.element(category, index)?.html.clone(),
                    Pick::Following(category, index, depth) => {
                        page.following(category, index, depth)?.to_string()
                    }
                    Pick::Image(name) => page.image(name)?.to_string(),
                    Pick::CurrentImage(name) => page.current_image(name)?.to_string(),
                    Pick::SourceLink => page.source_link(),
                })
            })
            .collect()
    }
}
