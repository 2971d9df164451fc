pub mod analysis;
pub mod token;
pub mod user;

pub use analysis::{
    AnalysisReport, CategoryCount, CellValue, ColumnType, DataRow, FileKind, FullDataset,
    MissingValues, NumericSummary, OrderedMap,
};
pub use token::{Claims, LoginResponse, VerifyResponse};
pub use user::{User, UserProfile, UserResponse};
