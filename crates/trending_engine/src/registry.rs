use trending_core::PageSpec;

use crate::credentials::Credentials;
use crate::error::ConfigurationError;
use crate::select::FragmentSelector;

/// A page spec together with the selector that knows its layout.
pub struct PageKind {
    spec: PageSpec,
    selector: Box<dyn FragmentSelector>,
}

impl PageKind {
    pub fn new(spec: PageSpec, selector: impl FragmentSelector + 'static) -> Self {
        Self {
            spec,
            selector: Box::new(selector),
        }
    }

    pub fn spec(&self) -> &PageSpec {
        &self.spec
    }

    pub fn selector(&self) -> &dyn FragmentSelector {
        self.selector.as_ref()
    }
}

/// Ordered table of page kinds. Registration order is report order.
#[derive(Default)]
pub struct Registry {
    kinds: Vec<PageKind>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        spec: PageSpec,
        selector: impl FragmentSelector + 'static,
    ) -> Result<(), ConfigurationError> {
        if self.get(spec.key()).is_some() {
            return Err(ConfigurationError::DuplicatePage {
                key: spec.key().to_string(),
            });
        }
        self.kinds.push(PageKind::new(spec, selector));
        Ok(())
    }

    pub fn with(
        mut self,
        spec: PageSpec,
        selector: impl FragmentSelector + 'static,
    ) -> Result<Self, ConfigurationError> {
        self.register(spec, selector)?;
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<&PageKind> {
        self.kinds.iter().find(|kind| kind.spec.key() == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageKind> {
        self.kinds.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.kinds.iter().map(|kind| kind.spec.key())
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Narrows the registry to a single page.
    pub fn retain_only(mut self, key: &str) -> Result<Self, ConfigurationError> {
        self.kinds.retain(|kind| kind.spec.key() == key);
        if self.kinds.is_empty() {
            return Err(ConfigurationError::UnknownPage {
                key: key.to_string(),
            });
        }
        Ok(self)
    }

    /// Every page that needs a login must find one before anything is fetched.
    pub fn check_credentials(&self, credentials: &Credentials) -> Result<(), ConfigurationError> {
        for kind in &self.kinds {
            credentials.login_for(&kind.spec)?;
        }
        Ok(())
    }
}
