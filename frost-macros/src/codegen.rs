use frost::codegen::{CodeGenerator, Codegen};
use proc_macro2::TokenStream;

/// A map value, emitted verbatim.
///
/// Values are never hashed, so the macro doesn't need to understand them.
pub struct PassThrough(pub TokenStream);

impl Codegen for PassThrough {
    fn generate_piece(&self, _gen: &mut CodeGenerator) -> TokenStream {
        self.0.clone()
    }
}
