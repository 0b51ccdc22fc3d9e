use crate::model::{ModelOption, ProviderCatalog};

/// Flatten connected providers into `provider/model` options, filtered by
/// a case-insensitive substring of the model name.
pub fn filter_models(catalog: Option<&ProviderCatalog>, query: &str) -> Vec<ModelOption> {
    let Some(catalog) = catalog else {
        return Vec::new();
    };
    let query = query.to_lowercase();
    catalog
        .all
        .iter()
        .filter(|provider| catalog.is_connected(&provider.id))
        .flat_map(|provider| {
            provider.models.iter().map(|(model_id, info)| ModelOption {
                id: format!("{}/{}", provider.id, model_id),
                name: info.name.clone(),
                provider: provider.id.clone(),
                model: model_id.clone(),
            })
        })
        .filter(|option| query.is_empty() || option.name.to_lowercase().contains(&query))
        .collect()
}

/// Variants of the selected `provider/model`; empty when unknown.
pub fn model_variants<'a>(catalog: Option<&'a ProviderCatalog>, selected_model: &str) -> &'a [String] {
    let Some(catalog) = catalog else {
        return &[];
    };
    let mut split = selected_model.split('/');
    let (Some(provider_id), Some(model_id)) = (split.next(), split.next()) else {
        return &[];
    };
    if provider_id.is_empty() || model_id.is_empty() {
        return &[];
    }
    catalog
        .provider(provider_id)
        .and_then(|provider| provider.models.get(model_id))
        .map(|model| model.variants.as_slice())
        .unwrap_or(&[])
}

pub fn has_variants(variants: &[String]) -> bool {
    !variants.is_empty()
}

pub fn is_model_selected(option: &ModelOption, selected_model: Option<&str>) -> bool {
    selected_model == Some(option.id.as_str())
}

pub fn model_button_text(selected_model: Option<&str>) -> &str {
    selected_model.filter(|m| !m.is_empty()).unwrap_or("Default model")
}

pub fn variant_button_text(selected_variant: Option<&str>) -> &str {
    selected_variant.filter(|v| !v.is_empty()).unwrap_or("Variant")
}

pub fn agent_button_text(selected_agent: Option<&str>) -> &str {
    selected_agent.filter(|a| !a.is_empty()).unwrap_or("Agent")
}

/// Next entry after `current` in `options`, wrapping through "none".
pub fn cycle<'a>(options: &'a [String], current: Option<&str>) -> Option<&'a str> {
    match current.and_then(|c| options.iter().position(|o| o == c)) {
        None => options.first().map(String::as_str),
        Some(i) => options.get(i + 1).map(String::as_str),
    }
}
