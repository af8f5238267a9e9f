// フィルタ指定文字列の解析

use super::{
    ChannelConstraint, CompareOp, Constraint, DimensionConstraint, DimensionField, Filter,
    FormatConstraint, SizeConstraint, ValidityConstraint,
};
use crate::core::{ColorLayout, ScanError, ScanResult};
use image::ImageFormat;
use regex::Regex;
use std::num::IntErrorKind;
use std::sync::LazyLock;

/// 比較形式のフィルタ指定（例: `filesize>10.5m`, `short<512`）
static COMPARISON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[a-z]+)(?P<op>[<>=!]+)(?P<num>[0-9]+(?:\.[0-9]+)?)(?P<unit>[a-z]*)$")
        .expect("Invalid comparison regex")
});

/// 単一のフィルタ指定を解析する
///
/// 先頭の `!` は否定。大文字小文字は区別しない。
pub fn parse_filter(spec: &str) -> ScanResult<Filter> {
    let normalized = spec.trim().to_ascii_lowercase();
    let (negated, body) = match normalized.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, normalized.as_str()),
    };

    if body.is_empty() {
        return Err(ScanError::constraint_spec(spec, "空のフィルタ指定です"));
    }

    let constraint = match parse_keyword(body) {
        Some(constraint) => constraint,
        None => parse_comparison(spec, body)?,
    };

    Ok(Filter {
        negated,
        constraint,
    })
}

fn parse_keyword(body: &str) -> Option<Constraint> {
    let channel = |layout| Some(Constraint::Channel(ChannelConstraint { layout }));
    let format = |format| Some(Constraint::Format(FormatConstraint { format }));

    match body {
        "rgb" => channel(ColorLayout::Rgb),
        "rgba" => channel(ColorLayout::Rgba),
        "gray" | "grey" => channel(ColorLayout::Gray),
        "graya" | "greya" => channel(ColorLayout::GrayAlpha),
        "png" => format(ImageFormat::Png),
        "jpg" | "jpeg" => format(ImageFormat::Jpeg),
        "gif" => format(ImageFormat::Gif),
        "bmp" => format(ImageFormat::Bmp),
        "tif" | "tiff" => format(ImageFormat::Tiff),
        "webp" => format(ImageFormat::WebP),
        "valid" => Some(Constraint::Validity(ValidityConstraint)),
        _ => None,
    }
}

fn parse_comparison(spec: &str, body: &str) -> ScanResult<Constraint> {
    let captures = COMPARISON
        .captures(body)
        .ok_or_else(|| ScanError::constraint_spec(spec, "解釈できないフィルタ指定です"))?;

    let name = &captures["name"];
    let op = CompareOp::parse(&captures["op"]).ok_or_else(|| {
        ScanError::constraint_spec(spec, format!("不明な演算子: {}", &captures["op"]))
    })?;
    let number = &captures["num"];
    let unit = &captures["unit"];

    match name {
        "filesize" | "size" => Ok(Constraint::Size(SizeConstraint {
            op,
            bytes: parse_size(spec, number, unit)?,
        })),
        _ => {
            let field = DimensionField::parse(name).ok_or_else(|| {
                ScanError::constraint_spec(spec, format!("不明なフィールド: {name}"))
            })?;
            if !unit.is_empty() {
                return Err(ScanError::constraint_spec(
                    spec,
                    format!("寸法に単位は指定できません: {unit}"),
                ));
            }
            let value = number.parse::<u64>().map_err(|e| match e.kind() {
                IntErrorKind::PosOverflow => {
                    ScanError::constraint_spec(spec, "寸法が大きすぎます")
                }
                _ => ScanError::constraint_spec(spec, "寸法は整数で指定してください"),
            })?;
            Ok(Constraint::Dimension(DimensionConstraint { field, op, value }))
        }
    }
}

/// サイズ指定をバイト数に正規化する（単位は 1024 の累乗）
fn parse_size(spec: &str, number: &str, unit: &str) -> ScanResult<u64> {
    let multiplier: u64 = match unit {
        "" | "b" => 1,
        "k" => 1 << 10,
        "m" => 1 << 20,
        "g" => 1 << 30,
        other => {
            return Err(ScanError::constraint_spec(
                spec,
                format!("不明なサイズ単位: {other}"),
            ))
        }
    };

    if let Ok(integer) = number.parse::<u64>() {
        return integer
            .checked_mul(multiplier)
            .ok_or_else(|| ScanError::constraint_spec(spec, "サイズが大きすぎます"));
    }

    let fractional = number
        .parse::<f64>()
        .map_err(|_| ScanError::constraint_spec(spec, "サイズを数値として解釈できません"))?;
    let bytes = fractional * multiplier as f64;
    if !bytes.is_finite() || bytes >= u64::MAX as f64 {
        return Err(ScanError::constraint_spec(spec, "サイズが大きすぎます"));
    }

    Ok(bytes as u64)
}
