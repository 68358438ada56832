//! 预导入模块，方便使用

pub use super::academic_reports::{
    ActiveModel as AcademicReportActiveModel, Entity as AcademicReports,
    Model as AcademicReportModel,
};
pub use super::classes::{ActiveModel as ClassActiveModel, Entity as Classes, Model as ClassModel};
pub use super::classrooms::{
    ActiveModel as ClassroomActiveModel, Entity as Classrooms, Model as ClassroomModel,
};
pub use super::competencies::{
    ActiveModel as CompetencyActiveModel, Entity as Competencies, Model as CompetencyModel,
};
pub use super::groups::{ActiveModel as GroupActiveModel, Entity as Groups, Model as GroupModel};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::subjects::{
    ActiveModel as SubjectActiveModel, Entity as Subjects, Model as SubjectModel,
};
pub use super::teachers::{
    ActiveModel as TeacherActiveModel, Entity as Teachers, Model as TeacherModel,
};
pub use super::user_identities::{
    ActiveModel as UserIdentityActiveModel, Entity as UserIdentities, Model as UserIdentityModel,
};
