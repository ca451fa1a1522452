use serde::Serialize;

use symbols_lib::SymbolSet;

use crate::VerifyResult;

#[derive(Debug, Clone, Serialize)]
pub struct ApiVerifyResult {
    pub declared: SymbolSet,
    pub defined: SymbolSet,
    pub missing: SymbolSet,
}

impl ApiVerifyResult {
    pub fn compare(declared: &SymbolSet, defined: &SymbolSet) -> Self {
        let missing: SymbolSet = declared.difference(defined).cloned().collect();
        for symbol in &missing {
            log::warn!("Missing API symbol: {symbol}");
        }
        if missing.is_empty() {
            for symbol in declared {
                log::debug!("Declared API symbol found: {symbol}");
            }
            for symbol in defined {
                log::debug!("Exported symbol found: {symbol}");
            }
        }
        return Self {
            declared: declared.clone(),
            defined: defined.clone(),
            missing,
        };
    }
}

impl VerifyResult for ApiVerifyResult {
    fn is_good(&self) -> bool {
        return self.missing.is_empty();
    }
}
