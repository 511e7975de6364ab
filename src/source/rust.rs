//! Rust frontend using syn for AST parsing
//!
//! Code Quality Principle: Specialized Analysis Services - the Rust frontend provides real syntax
//! - Implements SourceParser so Rust files flow through the same rules as every other language
//! - Walks items, impl blocks and traits with a syn visitor to collect declarations
//! - Translates syn spans and parse errors into 1-based locations

use super::{Declaration, DeclarationKind, Language, ParseError, SourceParser, SourceUnit};
use crate::domain::violations::Location;
use std::path::Path;
use syn::visit::Visit;

/// Frontend for `.rs` files
#[derive(Debug, Default, Clone, Copy)]
pub struct RustParser;

impl SourceParser for RustParser {
    fn parse(&self, path: &Path, text: &str) -> Result<SourceUnit, ParseError> {
        let syntax_tree = syn::parse_file(text).map_err(|e| {
            let start = e.span().start();
            ParseError::new(e.to_string(), start.line.max(1) as u32, start.column as u32 + 1)
        })?;

        let mut visitor = DeclarationVisitor::default();
        visitor.visit_file(&syntax_tree);

        tracing::debug!(
            "Parsed {} with {} declarations",
            path.display(),
            visitor.declarations.len()
        );

        Ok(SourceUnit::new(path, Language::Rust, text, visitor.declarations))
    }
}

fn span_location(ident: &syn::Ident) -> Location {
    let start = ident.span().start();
    Location::new(start.line as u32, start.column as u32 + 1)
}

fn has_doc(attrs: &[syn::Attribute]) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident("doc"))
}

fn is_public(vis: &syn::Visibility) -> bool {
    matches!(vis, syn::Visibility::Public(_))
}

/// Collects named items; methods of trait impls inherit the trait's contract and are never public
#[derive(Default)]
struct DeclarationVisitor {
    declarations: Vec<Declaration>,
    in_trait_impl: bool,
    in_public_trait: bool,
}

impl DeclarationVisitor {
    fn push(
        &mut self,
        kind: DeclarationKind,
        keyword: &str,
        ident: &syn::Ident,
        is_public: bool,
        attrs: &[syn::Attribute],
    ) {
        self.declarations.push(Declaration {
            kind,
            keyword: keyword.to_string(),
            name: ident.to_string(),
            location: span_location(ident),
            is_public,
            has_doc: has_doc(attrs),
        });
    }
}

impl Visit<'_> for DeclarationVisitor {
    fn visit_item_struct(&mut self, item: &syn::ItemStruct) {
        self.push(DeclarationKind::Type, "struct", &item.ident, is_public(&item.vis), &item.attrs);
        syn::visit::visit_item_struct(self, item);
    }

    fn visit_item_enum(&mut self, item: &syn::ItemEnum) {
        self.push(DeclarationKind::Type, "enum", &item.ident, is_public(&item.vis), &item.attrs);
        syn::visit::visit_item_enum(self, item);
    }

    fn visit_item_union(&mut self, item: &syn::ItemUnion) {
        self.push(DeclarationKind::Type, "union", &item.ident, is_public(&item.vis), &item.attrs);
        syn::visit::visit_item_union(self, item);
    }

    fn visit_item_type(&mut self, item: &syn::ItemType) {
        self.push(DeclarationKind::Type, "type", &item.ident, is_public(&item.vis), &item.attrs);
        syn::visit::visit_item_type(self, item);
    }

    fn visit_item_trait(&mut self, item: &syn::ItemTrait) {
        let public = is_public(&item.vis);
        self.push(DeclarationKind::Type, "trait", &item.ident, public, &item.attrs);

        let outer = self.in_public_trait;
        self.in_public_trait = public;
        syn::visit::visit_item_trait(self, item);
        self.in_public_trait = outer;
    }

    fn visit_item_fn(&mut self, item: &syn::ItemFn) {
        self.push(DeclarationKind::Function, "fn", &item.sig.ident, is_public(&item.vis), &item.attrs);
        syn::visit::visit_item_fn(self, item);
    }

    fn visit_item_impl(&mut self, item: &syn::ItemImpl) {
        let outer = self.in_trait_impl;
        self.in_trait_impl = item.trait_.is_some();
        syn::visit::visit_item_impl(self, item);
        self.in_trait_impl = outer;
    }

    fn visit_impl_item_fn(&mut self, item: &syn::ImplItemFn) {
        let public = !self.in_trait_impl && is_public(&item.vis);
        self.push(DeclarationKind::Function, "fn", &item.sig.ident, public, &item.attrs);
        syn::visit::visit_impl_item_fn(self, item);
    }

    fn visit_trait_item_fn(&mut self, item: &syn::TraitItemFn) {
        let public = self.in_public_trait;
        self.push(DeclarationKind::Function, "fn", &item.sig.ident, public, &item.attrs);
        syn::visit::visit_trait_item_fn(self, item);
    }

    fn visit_item_const(&mut self, item: &syn::ItemConst) {
        // `const _: () = ...;` is an anonymous assertion, not a named constant
        if item.ident != "_" {
            self.push(DeclarationKind::Constant, "const", &item.ident, is_public(&item.vis), &item.attrs);
        }
        syn::visit::visit_item_const(self, item);
    }

    fn visit_item_static(&mut self, item: &syn::ItemStatic) {
        self.push(DeclarationKind::Constant, "static", &item.ident, is_public(&item.vis), &item.attrs);
        syn::visit::visit_item_static(self, item);
    }
}
