/// Delimiters accepted between extension tokens, e.g. `"jpg;png gif"`.
const TOKEN_DELIMITERS: [char; 2] = [';', ' '];

/// Whitelist of file extensions, parsed once when the dialog is built.
///
/// `None` tokens means every file is accepted. Directories are always
/// accepted so the user can keep navigating.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionFilter {
    tokens: Option<Vec<String>>,
}

impl ExtensionFilter {
    pub fn parse(raw: Option<&str>) -> Self {
        let tokens: Vec<String> = raw
            .map(|raw| {
                raw.split(TOKEN_DELIMITERS)
                    .filter(|token| !token.is_empty())
                    .map(|token| token.to_string())
                    .collect()
            })
            .unwrap_or_default();
        if tokens.is_empty() {
            return Self { tokens: None };
        }
        Self {
            tokens: Some(tokens),
        }
    }

    pub fn accept_all() -> Self {
        Self { tokens: None }
    }

    pub fn tokens(&self) -> Option<&[String]> {
        self.tokens.as_deref()
    }

    pub fn is_permissive(&self) -> bool {
        self.tokens.is_none()
    }

    pub fn accepts(&self, name: &str, is_dir: bool) -> bool {
        let Some(tokens) = &self.tokens else {
            return true;
        };
        if is_dir {
            return true;
        }
        let lower = name.to_lowercase();
        tokens
            .iter()
            .any(|token| lower.ends_with(&format!(".{}", token.to_lowercase())))
    }
}
