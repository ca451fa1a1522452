use symbols_lib::SymbolSet;

pub mod api;

pub trait VerifyResult {
    fn is_good(&self) -> bool;
}

/// Returns true iff every declared symbol is defined.
pub fn compare(declared: &SymbolSet, defined: &SymbolSet) -> bool {
    return api::ApiVerifyResult::compare(declared, defined).is_good();
}
