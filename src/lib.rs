//! Impala to Trino SQL converter.
//!
//! Rewrites Impala-specific function calls and syntax fragments in SQL text
//! into their Trino equivalents. The conversion is table-driven text
//! substitution, not parsing:
//!
//! 1. every rule of the [rule table](rules::rule_table) is applied in order,
//! 2. a fixed [post-processing pass](post_processor::PostProcessor) renames
//!    types, quoting, interval literals, escapes and project identifiers,
//! 3. the [validator](utils::validation::SqlValidator) scans the result for
//!    leftovers and reports advisory warnings.
//!
//! ```
//! let (sql, warnings, stats) = impala2trino::convert("SELECT ifnull(revenue, 0) FROM t", false)?;
//! assert_eq!(sql, "SELECT COALESCE(revenue, 0) FROM t");
//! assert!(warnings.is_empty());
//! assert_eq!(stats.total_conversions, 1);
//! # Ok::<(), impala2trino::ConversionError>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod post_processor;
pub mod rules;
pub mod stats;
pub mod utils;

pub use config::{ArgumentCapture, ConversionConfig, IdentifierRename};
pub use engine::RuleEngine;
pub use error::{ConversionError, ConversionResult, RuleError};
pub use stats::{ConversionOutput, ConversionStats};

use log::Level;
use post_processor::PostProcessor;
use utils::validation::SqlValidator;

/// Main converter: rule engine, post-processing and validation
pub struct SqlConverter {
    config: ConversionConfig,
    engine: RuleEngine<'static>,
    post_processor: PostProcessor,
    validator: SqlValidator,
}

impl SqlConverter {
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            engine: RuleEngine::new(&config),
            post_processor: PostProcessor::with_renames(
                config.post_processing.identifier_renames.clone(),
            ),
            validator: SqlValidator::new(),
            config,
        }
    }

    /// Convert Impala SQL to Trino SQL.
    ///
    /// Rule failures are reported as warnings and counted in
    /// [`ConversionStats::errors`]; only a post-processing failure aborts the
    /// conversion, as [`ConversionError::Failed`].
    pub fn convert(&self, sql: &str) -> ConversionResult<ConversionOutput> {
        let level = self.trace_level();
        log::log!(
            level,
            "Starting SQL conversion. Input length: {} characters",
            sql.chars().count()
        );

        let mut warnings = Vec::new();
        let mut stats = ConversionStats::new();

        let converted = self.engine.run(sql, &mut warnings, &mut stats);

        log::log!(level, "Applying additional transformations...");
        let converted = match self.post_processor.process(&converted) {
            Ok(sql) => sql,
            Err(e) => return Err(Self::fail(e, warnings, stats)),
        };

        if self.config.validation.enabled {
            log::log!(level, "Validating converted SQL...");
            let validation = self.validator.validate(&converted);
            log::log!(
                level,
                "Validation completed. Warnings: {}",
                validation.warnings.len()
            );
            warnings.extend(validation.warnings);
        }

        log::log!(
            level,
            "Conversion completed. Total conversions: {}, warnings: {}",
            stats.total_conversions,
            warnings.len()
        );

        Ok(ConversionOutput {
            sql: converted,
            warnings,
            stats,
        })
    }

    fn fail(
        error: ConversionError,
        mut warnings: Vec<String>,
        mut stats: ConversionStats,
    ) -> ConversionError {
        let message = error.to_string();
        log::error!("Failed to convert SQL: {}", message);
        warnings.push(format!("Failed to convert SQL: {}", message));
        stats.record_error();

        ConversionError::Failed {
            message,
            warnings,
            stats,
        }
    }

    fn trace_level(&self) -> Level {
        if self.config.debug {
            Level::Info
        } else {
            Level::Debug
        }
    }
}

impl Default for SqlConverter {
    fn default() -> Self {
        Self::new(ConversionConfig::default())
    }
}

/// Convert with the default configuration.
///
/// Returns the converted text, the warnings and the stats of this call.
pub fn convert(sql: &str, debug: bool) -> ConversionResult<(String, Vec<String>, ConversionStats)> {
    let converter = SqlConverter::new(ConversionConfig::default().with_debug(debug));
    converter.convert(sql).map(ConversionOutput::into_parts)
}
