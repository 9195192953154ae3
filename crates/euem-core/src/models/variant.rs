//! WMI 스칼라 값 모델 및 변환 엔진.
//!
//! WMI 제공자는 같은 속성이라도 설치 환경마다 다른 VARIANT 타입으로 값을 돌려준다.
//! 읽는 시점에 관찰되는 표현을 닫힌 열거형 [`Variant`]로 모델링하고,
//! 세 가지 목적 타입(u64, i64, f64)으로의 변환을 전수 `match`로 구현한다.
//!
//! 변환은 절대 실패하지 않는다. 인식할 수 없거나 범위를 벗어난 값은 0이 된다.
//! 음수를 u64로 변환할 때 비트 패턴이 감기는(wrap) 일은 없다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// i64 범위 상한 2^63 (배타)
const I64_UPPER_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// u64 범위 상한 2^64 (배타)
const U64_UPPER_BOUND: f64 = 18_446_744_073_709_551_616.0;

/// WMI 속성 값의 관찰 가능한 표현
///
/// 이름은 VARIANT 타입 태그(VT_I1, VT_UI8, VT_R4 ...)를 따른다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Variant {
    /// VT_EMPTY / VT_NULL
    #[default]
    Null,
    /// 8비트 부호 있는 정수
    I1(i8),
    /// 16비트 부호 있는 정수
    I2(i16),
    /// 32비트 부호 있는 정수
    I4(i32),
    /// 64비트 부호 있는 정수
    I8(i64),
    /// 8비트 부호 없는 정수
    UI1(u8),
    /// 16비트 부호 없는 정수
    UI2(u16),
    /// 32비트 부호 없는 정수
    UI4(u32),
    /// 64비트 부호 없는 정수
    UI8(u64),
    /// 32비트 부동소수점
    R4(f32),
    /// 64비트 부동소수점
    R8(f64),
    /// VT_BOOL
    Bool(bool),
    /// VT_BSTR
    String(String),
    /// VT_DATE (구조화된 시각 값)
    Date(DateTime<Utc>),
}

impl Variant {
    /// Null 여부
    pub fn is_null(&self) -> bool {
        matches!(self, Variant::Null)
    }

    /// VARIANT 타입 이름 (로그용)
    pub fn type_name(&self) -> &'static str {
        match self {
            Variant::Null => "Null",
            Variant::I1(_) => "I1",
            Variant::I2(_) => "I2",
            Variant::I4(_) => "I4",
            Variant::I8(_) => "I8",
            Variant::UI1(_) => "UI1",
            Variant::UI2(_) => "UI2",
            Variant::UI4(_) => "UI4",
            Variant::UI8(_) => "UI8",
            Variant::R4(_) => "R4",
            Variant::R8(_) => "R8",
            Variant::Bool(_) => "Bool",
            Variant::String(_) => "String",
            Variant::Date(_) => "Date",
        }
    }

    /// u64로 변환
    ///
    /// 음수, NaN/무한대, 범위 초과, 숫자가 아닌 문자열은 0.
    /// 문자열은 10진 부호 없는 정수로만 해석한다 (`+` 부호 불가).
    pub fn to_u64(&self) -> u64 {
        match self {
            Variant::Null => 0,
            Variant::I1(v) => non_negative(i64::from(*v)),
            Variant::I2(v) => non_negative(i64::from(*v)),
            Variant::I4(v) => non_negative(i64::from(*v)),
            Variant::I8(v) => non_negative(*v),
            Variant::UI1(v) => u64::from(*v),
            Variant::UI2(v) => u64::from(*v),
            Variant::UI4(v) => u64::from(*v),
            Variant::UI8(v) => *v,
            Variant::R4(v) => float_to_u64(f64::from(*v)),
            Variant::R8(v) => float_to_u64(*v),
            Variant::String(s) => parse_unsigned_text(s),
            Variant::Bool(_) | Variant::Date(_) => 0,
        }
    }

    /// i64로 변환
    ///
    /// i64::MAX를 넘는 u64 값과 범위를 벗어난 실수는 0.
    /// 문자열은 10진 부호 있는 정수로 해석한다.
    pub fn to_i64(&self) -> i64 {
        match self {
            Variant::Null => 0,
            Variant::I1(v) => i64::from(*v),
            Variant::I2(v) => i64::from(*v),
            Variant::I4(v) => i64::from(*v),
            Variant::I8(v) => *v,
            Variant::UI1(v) => i64::from(*v),
            Variant::UI2(v) => i64::from(*v),
            Variant::UI4(v) => i64::from(*v),
            Variant::UI8(v) => i64::try_from(*v).unwrap_or(0),
            Variant::R4(v) => float_to_i64(f64::from(*v)),
            Variant::R8(v) => float_to_i64(*v),
            Variant::String(s) => s.parse::<i64>().unwrap_or(0),
            Variant::Bool(_) | Variant::Date(_) => 0,
        }
    }

    /// f64로 변환
    ///
    /// 모든 정수/실수 표현은 수치 그대로 변환한다.
    /// 문자열은 10진/지수 표기를 허용한다. f64 범위를 넘는 값은 0.
    pub fn to_f64(&self) -> f64 {
        match self {
            Variant::Null => 0.0,
            Variant::I1(v) => f64::from(*v),
            Variant::I2(v) => f64::from(*v),
            Variant::I4(v) => f64::from(*v),
            Variant::I8(v) => *v as f64,
            Variant::UI1(v) => f64::from(*v),
            Variant::UI2(v) => f64::from(*v),
            Variant::UI4(v) => f64::from(*v),
            Variant::UI8(v) => *v as f64,
            Variant::R4(v) => f64::from(*v),
            Variant::R8(v) => *v,
            Variant::String(s) => parse_float_text(s),
            Variant::Bool(_) | Variant::Date(_) => 0.0,
        }
    }

    /// 문자열 필드 값
    ///
    /// VT_BSTR만 그대로 사용하고, 다른 표현은 빈 문자열.
    pub fn to_text(&self) -> String {
        match self {
            Variant::String(s) => s.clone(),
            _ => String::new(),
        }
    }

    /// 시각 필드 값
    ///
    /// 제공자가 구조화된 시각을 준 경우에만 `Some`. 문자열 파싱은 하지 않는다.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Variant::Date(dt) => Some(*dt),
            _ => None,
        }
    }
}

fn parse_unsigned_text(s: &str) -> u64 {
    if s.starts_with('+') {
        return 0;
    }
    s.parse().unwrap_or(0)
}

/// 문자열 실수 파싱
///
/// 유한하지 않은 결과는 `inf`/`nan` 표기를 직접 쓴 경우에만 유지한다.
fn parse_float_text(s: &str) -> f64 {
    let Ok(v) = s.parse::<f64>() else {
        return 0.0;
    };
    if v.is_finite() {
        return v;
    }
    let spelled = s.trim_start_matches(['+', '-']).to_ascii_lowercase();
    if matches!(spelled.as_str(), "inf" | "infinity" | "nan") {
        v
    } else {
        0.0
    }
}

fn non_negative(v: i64) -> u64 {
    u64::try_from(v).unwrap_or(0)
}

fn float_to_u64(v: f64) -> u64 {
    if v.is_finite() && v >= 0.0 && v < U64_UPPER_BOUND {
        v as u64
    } else {
        0
    }
}

fn float_to_i64(v: f64) -> i64 {
    if v.is_finite() && v >= -I64_UPPER_BOUND && v < I64_UPPER_BOUND {
        v as i64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 정수 표현 전체에 같은 샘플 값을 실어 보기 위한 헬퍼
    fn signed_reps(v: i64) -> Vec<Variant> {
        let mut reps = vec![Variant::I8(v)];
        if let Ok(n) = i32::try_from(v) {
            reps.push(Variant::I4(n));
        }
        if let Ok(n) = i16::try_from(v) {
            reps.push(Variant::I2(n));
        }
        if let Ok(n) = i8::try_from(v) {
            reps.push(Variant::I1(n));
        }
        reps
    }

    fn unsigned_reps(v: u64) -> Vec<Variant> {
        let mut reps = vec![Variant::UI8(v)];
        if let Ok(n) = u32::try_from(v) {
            reps.push(Variant::UI4(n));
        }
        if let Ok(n) = u16::try_from(v) {
            reps.push(Variant::UI2(n));
        }
        if let Ok(n) = u8::try_from(v) {
            reps.push(Variant::UI1(n));
        }
        reps
    }

    #[test]
    fn null_is_zero_for_every_kind() {
        let v = Variant::Null;
        assert_eq!(v.to_u64(), 0);
        assert_eq!(v.to_i64(), 0);
        assert_eq!(v.to_f64(), 0.0);
        assert_eq!(v.to_text(), "");
        assert!(v.to_datetime().is_none());
        assert!(v.is_null());
    }

    #[test]
    fn negative_signed_never_wraps_to_unsigned() {
        for sample in [-1i64, -100, i64::from(i8::MIN), i64::MIN] {
            for rep in signed_reps(sample) {
                assert_eq!(rep.to_u64(), 0, "{rep:?}");
                assert_eq!(rep.to_i64(), sample, "{rep:?}");
                assert_eq!(rep.to_f64(), sample as f64, "{rep:?}");
            }
        }
    }

    #[test]
    fn non_negative_signed_keeps_value() {
        for sample in [0i64, 1, 42, 127, i64::MAX] {
            for rep in signed_reps(sample) {
                assert_eq!(rep.to_u64(), sample as u64, "{rep:?}");
                assert_eq!(rep.to_i64(), sample, "{rep:?}");
            }
        }
    }

    #[test]
    fn unsigned_within_i64_range() {
        for sample in [0u64, 1, 255, 65_535, 4_294_967_295, i64::MAX as u64] {
            for rep in unsigned_reps(sample) {
                assert_eq!(rep.to_u64(), sample, "{rep:?}");
                assert_eq!(rep.to_i64(), sample as i64, "{rep:?}");
                assert_eq!(rep.to_f64(), sample as f64, "{rep:?}");
            }
        }
    }

    #[test]
    fn unsigned_above_i64_max_is_zero_as_signed() {
        let boundary = Variant::UI8(i64::MAX as u64 + 1);
        assert_eq!(boundary.to_i64(), 0);
        assert_eq!(boundary.to_u64(), 9_223_372_036_854_775_808);

        let max = Variant::UI8(u64::MAX);
        assert_eq!(max.to_i64(), 0);
        assert_eq!(max.to_u64(), u64::MAX);
    }

    #[test]
    fn floats_truncate_toward_zero() {
        assert_eq!(Variant::R8(12.9).to_u64(), 12);
        assert_eq!(Variant::R8(12.9).to_i64(), 12);
        assert_eq!(Variant::R8(-12.9).to_i64(), -12);
        assert_eq!(Variant::R4(3.5).to_u64(), 3);
        assert_eq!(Variant::R4(3.5).to_f64(), 3.5);
        assert_eq!(Variant::R8(0.25).to_f64(), 0.25);
    }

    #[test]
    fn negative_float_is_zero_as_unsigned() {
        assert_eq!(Variant::R8(-0.5).to_u64(), 0);
        assert_eq!(Variant::R4(-7.0).to_u64(), 0);
    }

    #[test]
    fn non_finite_and_out_of_range_floats_are_zero() {
        for v in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(Variant::R8(v).to_u64(), 0);
            assert_eq!(Variant::R8(v).to_i64(), 0);
        }
        assert_eq!(Variant::R8(1e20).to_u64(), 0);
        assert_eq!(Variant::R8(1e19).to_i64(), 0);
        assert_eq!(Variant::R8(-1e19).to_i64(), 0);
        assert_eq!(Variant::R8(1e19).to_u64(), 10_000_000_000_000_000_000);
    }

    #[test]
    fn decimal_text() {
        let text = Variant::String("1234".to_string());
        assert_eq!(text.to_u64(), 1234);
        assert_eq!(text.to_i64(), 1234);
        assert_eq!(text.to_f64(), 1234.0);

        let negative = Variant::String("-5".to_string());
        assert_eq!(negative.to_u64(), 0);
        assert_eq!(negative.to_i64(), -5);
        assert_eq!(negative.to_f64(), -5.0);

        let max = Variant::String("18446744073709551615".to_string());
        assert_eq!(max.to_u64(), u64::MAX);
        assert_eq!(max.to_i64(), 0);

        // 부호 없는 정수는 `+` 부호를 받지 않고, 부호 있는 정수는 받는다
        let plus = Variant::String("+5".to_string());
        assert_eq!(plus.to_u64(), 0);
        assert_eq!(plus.to_i64(), 5);
        assert_eq!(plus.to_f64(), 5.0);
    }

    #[test]
    fn float_and_scientific_text() {
        assert_eq!(Variant::String("12.5".to_string()).to_f64(), 12.5);
        assert_eq!(Variant::String("1.5e3".to_string()).to_f64(), 1500.0);
        // 범위 초과는 0, 명시한 무한대/NaN은 유지
        assert_eq!(Variant::String("1e400".to_string()).to_f64(), 0.0);
        assert_eq!(Variant::String("-1e400".to_string()).to_f64(), 0.0);
        assert_eq!(Variant::String("inf".to_string()).to_f64(), f64::INFINITY);
        assert_eq!(Variant::String("-Infinity".to_string()).to_f64(), f64::NEG_INFINITY);
        assert!(Variant::String("NaN".to_string()).to_f64().is_nan());
        // 정수 변환은 정수 표기만 허용
        assert_eq!(Variant::String("12.5".to_string()).to_u64(), 0);
        assert_eq!(Variant::String("12.5".to_string()).to_i64(), 0);
    }

    #[test]
    fn non_numeric_text_is_zero() {
        for s in ["", "abc", "0x10", " 5", "5 "] {
            let v = Variant::String(s.to_string());
            assert_eq!(v.to_u64(), 0, "{s:?}");
            assert_eq!(v.to_i64(), 0, "{s:?}");
            assert_eq!(v.to_f64(), 0.0, "{s:?}");
        }
    }

    #[test]
    fn bool_and_date_are_not_numeric() {
        let now = Utc::now();
        for v in [Variant::Bool(true), Variant::Date(now)] {
            assert_eq!(v.to_u64(), 0);
            assert_eq!(v.to_i64(), 0);
            assert_eq!(v.to_f64(), 0.0);
        }
        assert_eq!(Variant::Date(now).to_datetime(), Some(now));
    }

    #[test]
    fn text_only_from_string_representation() {
        assert_eq!(Variant::String("Wi-Fi".to_string()).to_text(), "Wi-Fi");
        assert_eq!(Variant::UI4(7).to_text(), "");
        assert!(Variant::String("2024-01-01".to_string())
            .to_datetime()
            .is_none());
    }

    #[test]
    fn tagged_json_form() {
        let v: Variant = serde_json::from_str(r#"{ "type": "I4", "value": -3 }"#).unwrap();
        assert_eq!(v, Variant::I4(-3));
        let v: Variant = serde_json::from_str(r#"{ "type": "Null" }"#).unwrap();
        assert!(v.is_null());
        let v: Variant = serde_json::from_str(r#"{ "type": "String", "value": "x" }"#).unwrap();
        assert_eq!(v, Variant::String("x".to_string()));
        assert_eq!(v.type_name(), "String");
        assert_eq!(Variant::UI8(1).type_name(), "UI8");
    }
}
