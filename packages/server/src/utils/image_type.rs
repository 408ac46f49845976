use mime::Mime;

/// A validated `image/*` content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageType {
    essence: String,
    extension: String,
}

impl ImageType {
    /// Parse a declared content type such as `image/png` or
    /// `image/svg+xml; charset=utf-8`.
    ///
    /// Only the `image` top-level type is accepted. The file extension is the
    /// subtype without its structured-syntax suffix (`svg+xml` gives `svg`).
    pub fn parse(raw: &str) -> Result<Self, String> {
        let mime: Mime = raw
            .trim()
            .parse()
            .map_err(|_| format!("'{raw}' is not a valid content type"))?;

        if mime.type_() != mime::IMAGE {
            return Err(format!("Content type must be image/*, got '{}'", mime.essence_str()));
        }

        let extension = mime.subtype().as_str().to_ascii_lowercase();
        if extension.is_empty()
            || extension.len() > 16
            || !extension
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
        {
            return Err(format!("Unsupported image subtype '{}'", mime.subtype()));
        }

        Ok(Self {
            essence: mime.essence_str().to_ascii_lowercase(),
            extension,
        })
    }

    /// `type/subtype` without parameters, lowercased.
    pub fn essence(&self) -> &str {
        &self.essence
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}
