use parking_lot::RwLock;
use soulbrowser_core_types::PageContext;

/// Source of the current page snapshot, read synchronously when a session starts.
pub trait PageContextProvider: Send + Sync {
    fn current_page_context(&self) -> PageContext;
}

/// Provider returning whatever context it was last given.
#[derive(Debug, Default)]
pub struct StaticPageContext {
    current: RwLock<PageContext>,
}

impl StaticPageContext {
    pub fn new(context: PageContext) -> Self {
        Self {
            current: RwLock::new(context),
        }
    }

    pub fn set(&self, context: PageContext) {
        *self.current.write() = context;
    }
}

impl PageContextProvider for StaticPageContext {
    fn current_page_context(&self) -> PageContext {
        self.current.read().clone()
    }
}
