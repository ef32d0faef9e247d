//! Resource schemas, one per admin screen, plus the route-stop types used by the
//! [`sequence`](crate::sequence) editor.
//!
//! Each schema is a typed record implementing [`Resource`](crate::framework::Resource).
//! The screen itself is the generic engine; the aliases below name them.

pub mod alert;
pub mod bus;
pub mod bus_assignment;
pub mod bus_type;
pub mod crowd_report;
pub mod favourite_route;
pub mod feedback;
pub mod route_stop;
pub mod user;

pub use alert::*;
pub use bus::*;
pub use bus_assignment::*;
pub use bus_type::*;
pub use crowd_report::*;
pub use favourite_route::*;
pub use feedback::*;
pub use route_stop::*;
pub use user::*;

use crate::framework::WorkflowEngine;

pub type UserScreen = WorkflowEngine<User>;
pub type BusScreen = WorkflowEngine<Bus>;
pub type BusTypeScreen = WorkflowEngine<BusType>;
pub type AlertScreen = WorkflowEngine<Alert>;
pub type BusAssignmentScreen = WorkflowEngine<BusAssignment>;
pub type CrowdReportScreen = WorkflowEngine<CrowdReport>;
pub type FeedbackScreen = WorkflowEngine<Feedback>;
pub type FavouriteRouteScreen = WorkflowEngine<FavouriteRoute>;
