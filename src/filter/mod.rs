// フィルタ（述語）定義
// 文字列のフィルタ指定は起動時に一度だけ型付きの制約へ変換される

pub mod parser;

use crate::core::{ColorLayout, EntryMetadata, ScanError, ScanResult};
use image::ImageFormat;
use std::fmt;
use tracing::warn;

/// 数値比較演算子
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOp {
    pub fn parse(op: &str) -> Option<Self> {
        match op {
            "==" => Some(Self::Eq),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Ge),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            _ => None,
        }
    }

    pub fn compare(self, lhs: u64, rhs: u64) -> bool {
        match self {
            Self::Eq => lhs == rhs,
            Self::Gt => lhs > rhs,
            Self::Ge => lhs >= rhs,
            Self::Lt => lhs < rhs,
            Self::Le => lhs <= rhs,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
        }
    }
}

/// ファイルサイズ制約（単位はバイトに正規化済み）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeConstraint {
    pub op: CompareOp,
    pub bytes: u64,
}

/// 寸法の比較対象
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionField {
    Width,
    Height,
    /// max(width, height)
    Long,
    /// min(width, height)
    Short,
}

impl DimensionField {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "width" => Some(Self::Width),
            "height" => Some(Self::Height),
            "long" => Some(Self::Long),
            "short" => Some(Self::Short),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Width => "width",
            Self::Height => "height",
            Self::Long => "long",
            Self::Short => "short",
        }
    }
}

/// 寸法制約
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionConstraint {
    pub field: DimensionField,
    pub op: CompareOp,
    pub value: u64,
}

/// 画像フォーマット制約（ヘッダのシグネチャで判定）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatConstraint {
    pub format: ImageFormat,
}

/// 色チャンネル構成の制約
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConstraint {
    pub layout: ColorLayout,
}

/// 画像全体が正しくデコードできるかどうかの制約
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidityConstraint;

/// 型付きの制約
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Size(SizeConstraint),
    Dimension(DimensionConstraint),
    Format(FormatConstraint),
    Channel(ChannelConstraint),
    Validity(ValidityConstraint),
    /// 解釈できなかった指定。常に不一致として扱う
    Unsatisfiable { spec: String },
}

impl Constraint {
    /// メタデータに対して評価する
    ///
    /// 必要なフィールドが無い場合は None を返す。
    pub fn evaluate(&self, meta: &EntryMetadata) -> Option<bool> {
        match self {
            Self::Size(c) => meta.size_bytes.map(|size| c.op.compare(size, c.bytes)),
            Self::Dimension(c) => meta.header.map(|header| {
                let actual = match c.field {
                    DimensionField::Width => header.width,
                    DimensionField::Height => header.height,
                    DimensionField::Long => header.long_edge(),
                    DimensionField::Short => header.short_edge(),
                };
                c.op.compare(u64::from(actual), c.value)
            }),
            Self::Format(c) => meta.header.map(|header| header.format == Some(c.format)),
            Self::Channel(c) => meta.header.map(|header| header.color == c.layout),
            Self::Validity(_) => meta.valid,
            Self::Unsatisfiable { .. } => None,
        }
    }

    /// 評価に必要なデコードレベル
    pub fn decode_level(&self) -> DecodeLevel {
        match self {
            Self::Size(_) | Self::Unsatisfiable { .. } => DecodeLevel::None,
            Self::Dimension(_) | Self::Format(_) | Self::Channel(_) => DecodeLevel::Header,
            Self::Validity(_) => DecodeLevel::Full,
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Size(c) => write!(f, "filesize{}{}", c.op.as_str(), c.bytes),
            Self::Dimension(c) => write!(f, "{}{}{}", c.field.as_str(), c.op.as_str(), c.value),
            Self::Format(c) => write!(f, "{}", c.format.extensions_str().first().unwrap_or(&"?")),
            Self::Channel(c) => match c.layout {
                ColorLayout::Gray => f.write_str("gray"),
                ColorLayout::GrayAlpha => f.write_str("graya"),
                ColorLayout::Rgb => f.write_str("rgb"),
                ColorLayout::Rgba => f.write_str("rgba"),
            },
            Self::Validity(_) => f.write_str("valid"),
            Self::Unsatisfiable { spec } => write!(f, "<invalid:{spec}>"),
        }
    }
}

/// 否定可能なフィルタ
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub negated: bool,
    pub constraint: Constraint,
}

impl Filter {
    pub fn new(constraint: Constraint) -> Self {
        Self {
            negated: false,
            constraint,
        }
    }

    pub fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    /// 否定を適用した評価結果。データ不足は None のまま返す
    pub fn evaluate(&self, meta: &EntryMetadata) -> Option<bool> {
        self.constraint
            .evaluate(meta)
            .map(|matched| matched != self.negated)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str("!")?;
        }
        write!(f, "{}", self.constraint)
    }
}

/// メタデータ取得にどこまでのデコードが必要か
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DecodeLevel {
    None,
    Header,
    Full,
}

/// 述語評価に必要なメタデータ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirements {
    pub stat: bool,
    pub decode: DecodeLevel,
}

/// フィルタの論理積からなる述語
///
/// フィルタが一つも無い述語は全エントリに一致する。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    filters: Vec<Filter>,
}

impl Predicate {
    pub fn new(filters: Vec<Filter>) -> Self {
        Self { filters }
    }

    /// フィルタ指定を厳密に解析する。一つでも不正なら致命的エラー
    pub fn parse<S: AsRef<str>>(specs: &[S]) -> ScanResult<Self> {
        let filters = specs
            .iter()
            .map(|spec| parser::parse_filter(spec.as_ref()))
            .collect::<ScanResult<Vec<_>>>()?;
        Ok(Self::new(filters))
    }

    /// 不正な指定を常に不一致のフィルタに置き換えて解析する
    ///
    /// 不正な指定は起動時に一度だけ警告ログに出し、エラーとして返す。
    pub fn parse_lenient<S: AsRef<str>>(specs: &[S]) -> (Self, Vec<ScanError>) {
        let mut filters = Vec::with_capacity(specs.len());
        let mut errors = Vec::new();

        for spec in specs {
            let spec = spec.as_ref();
            match parser::parse_filter(spec) {
                Ok(filter) => filters.push(filter),
                Err(error) => {
                    warn!(spec, error = %error, "Invalid filter treated as never matching");
                    filters.push(Filter::new(Constraint::Unsatisfiable {
                        spec: spec.to_string(),
                    }));
                    errors.push(error);
                }
            }
        }

        (Self::new(filters), errors)
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// 解釈できない指定を含み、何にも一致し得ないかどうか
    pub fn is_unsatisfiable(&self) -> bool {
        self.filters
            .iter()
            .any(|f| matches!(f.constraint, Constraint::Unsatisfiable { .. }))
    }

    pub fn requirements(&self) -> Requirements {
        Requirements {
            stat: self
                .filters
                .iter()
                .any(|f| matches!(f.constraint, Constraint::Size(_))),
            decode: self
                .filters
                .iter()
                .map(|f| f.constraint.decode_level())
                .max()
                .unwrap_or(DecodeLevel::None),
        }
    }

    /// 全フィルタが成立するかどうか。データ不足のフィルタは不成立
    pub fn matches(&self, meta: &EntryMetadata) -> bool {
        self.filters.iter().all(|f| f.evaluate(meta) == Some(true))
    }

    /// サイズ制約だけで不一致が確定するかどうか
    ///
    /// デコード前の早期判定に使う。
    pub fn rejected_by_size(&self, meta: &EntryMetadata) -> bool {
        self.filters
            .iter()
            .filter(|f| matches!(f.constraint, Constraint::Size(_)))
            .any(|f| f.evaluate(meta) != Some(true))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.filters.is_empty() {
            return f.write_str("<all>");
        }
        for (i, filter) in self.filters.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{filter}")?;
        }
        Ok(())
    }
}
