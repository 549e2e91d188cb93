use contextor::{Reference, SearchScope};
use serde::{Deserialize, Serialize};

use crate::error_handler::AppError;

/// Optional query-string parameters for POST /query.
#[derive(Debug, Default, Deserialize)]
pub struct ScopeParams {
    #[serde(default)]
    pub index_name: Option<String>,
    /// `""` selects the default namespace.
    #[serde(default)]
    pub namespace: Option<String>,
}

impl ScopeParams {
    /// Neither parameter searches everything, `index_name` alone searches one
    /// index, and both search one namespace.
    pub fn into_scope(self) -> Result<SearchScope, AppError> {
        let index = self.index_name.filter(|i| !i.trim().is_empty());
        match (index, self.namespace) {
            (Some(index), Some(namespace)) => Ok(SearchScope::Namespace { index, namespace }),
            (Some(index), None) => Ok(SearchScope::Index { index }),
            (None, None) => Ok(SearchScope::Database),
            (None, Some(_)) => Err(AppError::BadRequest(
                "namespace requires index_name".into(),
            )),
        }
    }
}

/// Response payload for POST /query.
#[derive(Debug, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Generated answer, or the fixed fallback when nothing was found.
    pub response: String,
    pub success: bool,
    pub references: Vec<Reference>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(index: Option<&str>, ns: Option<&str>) -> ScopeParams {
        ScopeParams {
            index_name: index.map(str::to_string),
            namespace: ns.map(str::to_string),
        }
    }

    #[test]
    fn params_select_scope() {
        assert_eq!(params(None, None).into_scope().unwrap(), SearchScope::Database);
        assert_eq!(
            params(Some("docs"), None).into_scope().unwrap(),
            SearchScope::Index {
                index: "docs".into()
            }
        );
        assert_eq!(
            params(Some("docs"), Some("")).into_scope().unwrap(),
            SearchScope::Namespace {
                index: "docs".into(),
                namespace: String::new()
            }
        );
    }

    #[test]
    fn namespace_alone_is_rejected() {
        assert!(matches!(
            params(None, Some("manuals")).into_scope(),
            Err(AppError::BadRequest(_))
        ));
        assert!(params(Some(" "), Some("manuals")).into_scope().is_err());
    }
}
