//! String functions callable from templates.
//!
//! | Function | Example | Result |
//! |----------|---------|--------|
//! | `split` | `{{#each (split list ",")}}` | sequence of substrings |
//! | `trim` | `{{trim this}}` | whitespace stripped |
//! | `upper` | `{{upper @key}}` | upper-cased |
//! | `lower` | `{{lower this}}` | lower-cased |
//! | `contains` | `{{#if (contains @key "env")}}` | substring test |
//! | `index` | `{{index key}}`, `{{index map key}}` | value under `key` in the root context or in `map` |

use handlebars::{
    handlebars_helper, Context, Handlebars, Helper, HelperDef, JsonValue, RenderContext,
    RenderError, RenderErrorReason, ScopedJson,
};
use thiserror::Error;

/// Error raised by a template function on invalid arguments
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FunctionError {
    #[error("split separator must not be empty")]
    EmptySeparator,
}

/// Split `value` on every occurrence of `separator`
pub fn split<'a>(value: &'a str, separator: &str) -> Result<Vec<&'a str>, FunctionError> {
    if separator.is_empty() {
        return Err(FunctionError::EmptySeparator);
    }
    Ok(value.split(separator).collect())
}

pub fn trim(value: &str) -> &str {
    value.trim()
}

pub fn upper(value: &str) -> String {
    value.to_uppercase()
}

pub fn lower(value: &str) -> String {
    value.to_lowercase()
}

pub fn contains(haystack: &str, needle: &str) -> bool {
    haystack.contains(needle)
}

handlebars_helper!(TrimHelper: |value: str| trim(value));
handlebars_helper!(UpperHelper: |value: str| upper(value));
handlebars_helper!(LowerHelper: |value: str| lower(value));
handlebars_helper!(ContainsHelper: |haystack: str, needle: str| contains(haystack, needle));

/// `split` needs to report an empty separator, which the macro form cannot
struct SplitHelper;

impl HelperDef for SplitHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let value = str_param(h, "split", 0, "value")?;
        let separator = str_param(h, "split", 1, "separator")?;

        let parts = split(value, separator)
            .map_err(|e| RenderError::from(RenderErrorReason::Other(e.to_string())))?;

        Ok(ScopedJson::Derived(JsonValue::from(parts)))
    }
}

/// Map lookup reachable from any nesting depth.
///
/// With one argument the key is looked up in the root context, so templates
/// can reach the full label set from inside `each` or `with` blocks. With two
/// the first argument is the map. Missing keys yield null; a key that is not
/// a string, or a container that is not a map, is an error.
struct IndexHelper;

impl HelperDef for IndexHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let (container, key) = match h.params().len() {
            1 => (ctx.data(), str_param(h, "index", 0, "key")?),
            2 => (
                h.param(0)
                    .ok_or(RenderErrorReason::ParamNotFoundForIndex("index", 0))?
                    .value(),
                str_param(h, "index", 1, "key")?,
            ),
            _ => {
                return Err(RenderErrorReason::Other(
                    "index expects a key, or a map and a key".to_string(),
                )
                .into())
            }
        };

        let map = container.as_object().ok_or_else(|| {
            RenderErrorReason::ParamTypeMismatchForName(
                "index",
                "map".to_string(),
                "object".to_string(),
            )
        })?;

        Ok(ScopedJson::Derived(map.get(key).cloned().unwrap_or(JsonValue::Null)))
    }
}

fn str_param<'a>(
    h: &'a Helper<'_>,
    helper: &'static str,
    index: usize,
    name: &str,
) -> Result<&'a str, RenderError> {
    let param = h
        .param(index)
        .ok_or(RenderErrorReason::ParamNotFoundForIndex(helper, index))?;

    param.value().as_str().ok_or_else(|| {
        RenderErrorReason::ParamTypeMismatchForName(helper, name.to_string(), "str".to_string())
            .into()
    })
}

/// Register the function library into a template registry.
///
/// The set of functions is fixed; nothing is added after compilation.
pub fn register_functions(registry: &mut Handlebars<'static>) {
    registry.register_helper("split", Box::new(SplitHelper));
    registry.register_helper("trim", Box::new(TrimHelper));
    registry.register_helper("upper", Box::new(UpperHelper));
    registry.register_helper("lower", Box::new(LowerHelper));
    registry.register_helper("contains", Box::new(ContainsHelper));
    registry.register_helper("index", Box::new(IndexHelper));
}
