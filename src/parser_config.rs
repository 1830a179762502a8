/// Configuration options for the converters and the batch driver.
///
/// Use [`ConverterConfig::builder()`] to create a configuration instance.
/// This allows you to customize only the desired fields while falling back to sensible defaults for the rest.
///
/// # Configuration Options
///
/// | Parameter | Type | Default | Description |
/// |-----------|------|---------|-------------|
/// | `pandoc_program` | `String` | `"pandoc"` | Program invoked to convert `.docx` files |
/// | `detect_tables` | `bool` | `true` | Whether tables are detected on PDF pages and appended as pipe tables |
/// | `overwrite` | `bool` | `true` | Whether the batch driver replaces existing `.md` outputs |
///
/// # Example
///
/// ```
/// use office_to_md::ConverterConfig;
///
/// let config = ConverterConfig::builder()
///     .pandoc_program("/usr/local/bin/pandoc")
///     .detect_tables(false)
///     .build();
/// assert!(config.overwrite);
/// ```
#[derive(Debug, Clone)]
pub struct ConverterConfig {
    pub pandoc_program: String,
    pub detect_tables: bool,
    pub overwrite: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            pandoc_program: "pandoc".to_string(),
            detect_tables: true,
            overwrite: true,
        }
    }
}

impl ConverterConfig {
    pub fn builder() -> ConverterConfigBuilder {
        ConverterConfigBuilder::default()
    }
}

/// Builder for [`ConverterConfig`].
///
/// Allows setting individual configuration fields while falling back to defaults for any unspecified values
#[derive(Debug, Default)]
pub struct ConverterConfigBuilder {
    pandoc_program: Option<String>,
    detect_tables: Option<bool>,
    overwrite: Option<bool>,
}

impl ConverterConfigBuilder {
    /// Sets the program used for `.docx` conversion.
    pub fn pandoc_program(mut self, value: impl Into<String>) -> Self {
        self.pandoc_program = Some(value.into());
        self
    }

    /// Sets whether PDF pages are scanned for tables.
    pub fn detect_tables(mut self, value: bool) -> Self {
        self.detect_tables = Some(value);
        self
    }

    /// Sets whether existing outputs are replaced during a batch run.
    pub fn overwrite(mut self, value: bool) -> Self {
        self.overwrite = Some(value);
        self
    }

    /// Builds the final [`ConverterConfig`] instance, applying default values for any fields that were not set.
    pub fn build(self) -> ConverterConfig {
        let defaults = ConverterConfig::default();
        ConverterConfig {
            pandoc_program: self.pandoc_program.unwrap_or(defaults.pandoc_program),
            detect_tables: self.detect_tables.unwrap_or(defaults.detect_tables),
            overwrite: self.overwrite.unwrap_or(defaults.overwrite),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_falls_back_to_defaults() {
        let config = ConverterConfig::builder().detect_tables(false).build();
        assert_eq!(config.pandoc_program, "pandoc");
        assert!(!config.detect_tables);
        assert!(config.overwrite);
    }
}
