//! 도메인 모델.
//!
//! 일별 MVRV 시계열과 파생 Z-Score 시계열을 표현하는 타입들입니다.
//! 모든 시계열은 날짜 오름차순으로 정렬된 Vec으로 다루며,
//! 정렬 책임은 데이터를 생산하는 쪽(Ingestion Adapter)에 있습니다.

pub mod point;
pub mod response;

pub use point::{DerivedPoint, RawPoint};
pub use response::RollingResponse;
