//! Modifier resolution against the catalog.

use super::catalog::Catalog;
use crate::base::RuntimeType;
use crate::syntax::{ModifierArg, ModifierChain, ModifierRecord, ModifierStyle, Symbol};

/// Turn parameters named after registered modifiers into parameter-style
/// records (`{{ title upper="true" }}`). Only applies to non-tag symbols.
pub fn extract_parameter_modifiers(catalog: &Catalog, symbol: &mut Symbol) {
    if symbol.is_tag || symbol.is_closing_tag || symbol.is_comment {
        return;
    }
    let mut found = Vec::new();
    for parameter in symbol.parameters.iter_mut() {
        if parameter.is_variable_reference || !catalog.has_modifier(&parameter.name) {
            continue;
        }
        parameter.is_modifier = true;
        let record = ModifierRecord::new(
            parameter.name.clone(),
            ModifierStyle::Parameter,
            parameter.name_span,
        )
        .with_arg(ModifierArg {
            text: parameter.value.as_str().into(),
            span: parameter.value_span,
        });
        found.push(record);
    }
    if found.is_empty() {
        return;
    }
    for record in found {
        symbol.modifiers.push(record);
    }
    symbol
        .modifiers
        .records_mut()
        .sort_by_key(|r| r.span.start_offset());
}

/// Fold a chain left to right starting from `source`.
///
/// Each registered modifier's return type becomes the next link's input. An
/// unregistered link keeps the type unchanged and is marked as such.
pub fn resolve_chain(
    catalog: &Catalog,
    chain: &mut ModifierChain,
    source: RuntimeType,
) -> RuntimeType {
    let mut current = source.clone();
    for record in chain.records_mut() {
        record.input_type = current.clone();
        match catalog.modifier(&record.name) {
            Some(definition) => {
                record.has_registered_modifier = true;
                record.output_type = definition.return_type(&current);
            }
            None => {
                record.has_registered_modifier = false;
                record.output_type = current.clone();
            }
        }
        current = record.output_type.clone();
    }
    chain.source_type = source;
    chain.manifest_type = current.clone();
    current
}

/// Registered links whose assumed input is not among the accepted types.
pub fn type_mismatches<'c>(
    catalog: &Catalog,
    chain: &'c ModifierChain,
) -> Vec<&'c ModifierRecord> {
    chain
        .records()
        .iter()
        .filter(|record| {
            catalog
                .modifier(&record.name)
                .is_some_and(|def| !def.accepts_type(&record.input_type))
        })
        .collect()
}
