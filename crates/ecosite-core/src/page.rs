#![forbid(unsafe_code)]

//! Page registry: the fixed set of content sections the site can show.

use serde::{Deserialize, Serialize};

use crate::error::SiteError;
use crate::util::sanitize_for_url;

/// Hero text and search keywords for one content section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl PageInfo {
    fn new(title: &str, description: &str, keywords: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        }
    }
}

/// Ordered, immutable mapping from page id to [`PageInfo`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageRegistry {
    entries: Vec<(String, PageInfo)>,
}

impl PageRegistry {
    /// Build a registry from `(id, info)` pairs.
    ///
    /// Later duplicates of an id are ignored with a warning.
    pub fn new(entries: impl IntoIterator<Item = (String, PageInfo)>) -> Result<Self, SiteError> {
        let mut registry = Self::default();
        for (id, info) in entries {
            if registry.contains(&id) {
                tracing::warn!(page = %id, "duplicate page id ignored");
                continue;
            }
            if sanitize_for_url(&id) != id {
                tracing::warn!(page = %id, "page id is not URL-safe");
            }
            registry.entries.push((id, info));
        }
        if registry.entries.is_empty() {
            return Err(SiteError::EmptyRegistry);
        }
        Ok(registry)
    }

    /// Parse a JSON object of `id -> {title, description, keywords}`.
    ///
    /// Key order of the object is preserved.
    pub fn from_json(json: &str) -> Result<Self, SiteError> {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut entries = Vec::with_capacity(map.len());
        for (id, value) in map {
            let info: PageInfo = serde_json::from_value(value)?;
            entries.push((id, info));
        }
        Self::new(entries)
    }

    /// The eight sections of the sustainability site.
    #[must_use]
    pub fn builtin() -> Self {
        let entries = [
            (
                "energia",
                PageInfo::new(
                    "Energia Limpa",
                    "Entenda as principais fontes de energia renovável e como elas ajudam a reduzir emissões de gases do efeito estufa.",
                    &["solar", "eólica", "hidrogênio", "biomassa", "renovável"],
                ),
            ),
            (
                "agua",
                PageInfo::new(
                    "Gestão da Água",
                    "Gestão, saneamento e tecnologias de reuso para garantir acesso universal à água potável.",
                    &["bacias", "dessalinização", "saneamento", "purificação"],
                ),
            ),
            (
                "biodiversidade",
                PageInfo::new(
                    "Biodiversidade",
                    "Conservação de espécies e habitats para manter o equilíbrio dos ecossistemas.",
                    &["habitats", "espécies", "conservação", "polinizadores"],
                ),
            ),
            (
                "agricultura",
                PageInfo::new(
                    "Agricultura Sustentável",
                    "Agroecologia, solo e sistemas resilientes para produção de alimentos sustentável.",
                    &["agroecologia", "agrofloresta", "solo", "precisão"],
                ),
            ),
            (
                "residuos",
                PageInfo::new(
                    "Gestão de Resíduos",
                    "Reduzir, reciclar e economia circular para minimizar impactos ambientais.",
                    &["redução", "circular", "reciclagem", "logística"],
                ),
            ),
            (
                "cidades",
                PageInfo::new(
                    "Cidades e Mobilidade",
                    "Urbanismo, transporte e infraestrutura verde para cidades mais sustentáveis.",
                    &["mobilidade", "infraestrutura", "transporte", "inteligentes"],
                ),
            ),
            (
                "educacao",
                PageInfo::new(
                    "Educação Ambiental",
                    "Comunicação científica e engajamento para formar cidadãos conscientes.",
                    &["comunicação", "escolar", "engajamento", "mídia"],
                ),
            ),
            (
                "politicas",
                PageInfo::new(
                    "Políticas e Economia",
                    "Governança, incentivos e instrumentos econômicos para desenvolvimento sustentável.",
                    &["instrumentos", "governança", "parcerias", "financiamento"],
                ),
            ),
        ];
        Self {
            entries: entries
                .into_iter()
                .map(|(id, info)| (id.to_string(), info))
                .collect(),
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&PageInfo> {
        self.entries
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, info)| info)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Page ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compare registry ids with ids found in the markup.
    ///
    /// Returns the ids only present on one side: `(missing_in_markup, unregistered)`.
    #[must_use]
    pub fn diff_against<'a>(
        &self,
        markup: impl IntoIterator<Item = &'a str>,
    ) -> (Vec<String>, Vec<String>) {
        let markup: Vec<&str> = markup.into_iter().collect();
        let missing = self
            .ids()
            .filter(|id| !markup.contains(id))
            .map(str::to_string)
            .collect();
        let unregistered = markup
            .iter()
            .filter(|id| !self.contains(id))
            .map(|id| (*id).to_string())
            .collect();
        (missing, unregistered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_has_eight_pages_in_order() {
        let registry = PageRegistry::builtin();
        let ids: Vec<&str> = registry.ids().collect();
        assert_eq!(
            ids,
            vec![
                "energia",
                "agua",
                "biodiversidade",
                "agricultura",
                "residuos",
                "cidades",
                "educacao",
                "politicas"
            ]
        );
        assert_eq!(registry.get("biodiversidade").unwrap().title, "Biodiversidade");
        assert_eq!(registry.get("energia").unwrap().keywords.len(), 5);
    }

    #[test]
    fn builtin_ids_are_url_safe() {
        let registry = PageRegistry::builtin();
        for id in registry.ids() {
            assert_eq!(sanitize_for_url(id), id);
        }
    }

    #[test]
    fn empty_registry_is_an_error() {
        assert_eq!(PageRegistry::new(Vec::new()), Err(SiteError::EmptyRegistry));
    }

    #[test]
    fn duplicates_keep_the_first_entry() {
        let registry = PageRegistry::new([
            ("a".to_string(), PageInfo::new("First", "", &[])),
            ("a".to_string(), PageInfo::new("Second", "", &[])),
        ])
        .unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("a").unwrap().title, "First");
    }

    #[test]
    fn from_json_reads_pages() {
        let registry = PageRegistry::from_json(
            r#"{"solar": {"title": "Solar", "description": "Sol"}, "vento": {"title": "Vento", "description": "Ar", "keywords": ["eólica"]}}"#,
        )
        .unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.get("solar").unwrap().keywords.is_empty());
        assert_eq!(registry.get("vento").unwrap().keywords, vec!["eólica"]);
    }

    #[test]
    fn diff_reports_both_sides() {
        let registry = PageRegistry::builtin();
        let markup = [
            "energia",
            "agua",
            "biodiversidade",
            "agricultura",
            "residuos",
            "cidades",
            "educacao",
            "extra",
        ];
        let (missing, unregistered) = registry.diff_against(markup);
        assert_eq!(missing, vec!["politicas".to_string()]);
        assert_eq!(unregistered, vec!["extra".to_string()]);
    }
}
