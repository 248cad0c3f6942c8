//! Per-token pricing for the models we know about.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Look up (input, output) USD cost per token for a model name.
///
/// Matches on prefix so dated snapshots (`claude-sonnet-4-20250514`) resolve
/// to their family. Unknown models cost zero.
pub fn model_cost(model: &str) -> (Decimal, Decimal) {
    const TABLE: &[(&str, Decimal, Decimal)] = &[
        ("gemini-2.0-flash-lite", dec!(0.000000075), dec!(0.0000003)),
        ("gemini-2.0-flash", dec!(0.0000001), dec!(0.0000004)),
        ("gemini-1.5-pro", dec!(0.00000125), dec!(0.000005)),
        ("claude-sonnet-4", dec!(0.000003), dec!(0.000015)),
        ("claude-3-5-haiku", dec!(0.0000008), dec!(0.000004)),
        ("gpt-4o-mini", dec!(0.00000015), dec!(0.0000006)),
        ("gpt-4o", dec!(0.0000025), dec!(0.00001)),
    ];

    TABLE
        .iter()
        .find(|(prefix, _, _)| model.starts_with(prefix))
        .map(|(_, input, output)| (*input, *output))
        .unwrap_or((Decimal::ZERO, Decimal::ZERO))
}
