use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use lavka_catalog::ProductCatalog;
use lavka_documents::DocumentStore;
use lavka_posting::PostingEngine;
use lavka_treasury::TreasuryLedger;

/// All engine state: catalog, documents, stock posting, treasury.
#[derive(Debug, Default)]
pub struct EngineState {
    pub catalog: ProductCatalog,
    pub documents: DocumentStore,
    pub posting: PostingEngine,
    pub treasury: TreasuryLedger,
}

/// Shared handler state.
///
/// One reader/writer lock over the whole engine is the posting serialization
/// point: post/unpost (and every other mutation) take the write lock, reads
/// share the read lock and only ever observe fully committed ledger effects.
#[derive(Debug, Default)]
pub struct AppServices {
    state: RwLock<EngineState>,
}

impl AppServices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self) -> RwLockReadGuard<'_, EngineState> {
        self.state.read().unwrap()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, EngineState> {
        self.state.write().unwrap()
    }
}
