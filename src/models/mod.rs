pub mod activity_log;
pub mod announcement;
pub mod area;
pub mod bailing_schedule;
pub mod complaint;
pub mod complaint_photo;
pub mod feedback;
pub mod notification;
pub mod refresh_token;
pub mod report;
pub mod user;
pub mod water_bill;

pub use activity_log::{Entity as ActivityLog, Model as ActivityLogModel};
pub use announcement::{Entity as Announcement, Model as AnnouncementModel};
pub use area::{Entity as Area, Model as AreaModel};
pub use bailing_schedule::{Entity as BailingSchedule, Model as BailingScheduleModel};
pub use complaint::{Entity as Complaint, Model as ComplaintModel};
pub use complaint_photo::{Entity as ComplaintPhoto, Model as ComplaintPhotoModel};
pub use feedback::{Entity as Feedback, Model as FeedbackModel};
pub use notification::{Entity as Notification, Model as NotificationModel};
pub use refresh_token::Entity as RefreshToken;
pub use report::{Entity as Report, Model as ReportModel};
pub use user::{Entity as User, Model as UserModel};
pub use water_bill::{Entity as WaterBill, Model as WaterBillModel};
