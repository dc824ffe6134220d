//! 백그라운드 태스크 모듈.
//!
//! 서버 실행 중 주기적으로 실행되는 백그라운드 작업을 정의합니다.
//! - 롤링 Z-Score 캐시 갱신: 매일 강제 재계산으로 캐시를 선제 갱신

pub mod refresh;

pub use refresh::{start_rolling_refresh, RefreshTaskConfig};
