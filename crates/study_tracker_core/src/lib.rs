pub mod domain;
pub mod gateway;
pub mod period;
pub mod ports;
pub mod report;
pub mod subject_select;

pub use domain::{
    NewStudySession, ReportData, StudySession, Subject, SubjectColor, TimelinePoint,
    User, UserCredentials,
};
pub use gateway::{GatewayDecision, GatewayMode, GatewayPolicy};
pub use period::{DateRange, Period, WeekWindow};
pub use ports::{DatabaseService, IdentityResolver, PortError, PortResult, ResolvedIdentity};
pub use report::{aggregate, get_report_data, SummaryCards};
