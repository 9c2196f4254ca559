//! 仪表盘聚合。
//!
//! 每个角色一条路径：先解析本人档案（失败即终止），再并行读取各数据源，
//! 次要数据源失败时记录告警并以空结果继续。

use crate::aggregate::{
    collect_issues, collect_student_issues, finalize, own_rows, standalone_rows,
};
use crate::directory::{FloorRecord, HostelRecord, RoomRecord, by_name, people};
use crate::payload::{
    ChiefWardenDashboard, DashboardPayload, DashboardStats, FloorDashboard, HostelDashboard,
    StaffRoster, StudentDashboard,
};
use domain::collections::{
    CHIEF_WARDENS, FLOOR_ATTENDANTS, FLOOR_WARDENS, FLOORS, HOSTEL_WARDENS, HOSTELS, ISSUES,
    ROOMS, STUDENTS, SUPERVISORS,
};
use domain::{HostelError, Identity, Issue, Person, Role};
use hostel_normalize::{normalize_person, now_ms};
use hostel_scope::{ScopePredicate, find_profile, scope_for, scoped_students};
use hostel_storage::{Direction, Document, DocumentStore, Query, StorageError};
use hostel_telemetry::{record_dashboard_served, record_degraded_query};
use std::collections::BTreeSet;
use std::sync::Arc;

/// 仪表盘与工单列表服务。
pub struct DashboardService {
    pub(crate) store: Arc<dyn DocumentStore>,
}

/// 失败的次要查询降级为默认值，并记录来源。
pub(crate) fn degrade<T: Default>(
    result: Result<T, StorageError>,
    source: &str,
    degraded: &mut Vec<String>,
) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(
                target: "hostel.dashboard",
                source,
                error = %err,
                "sub-query failed, continuing with partial data"
            );
            record_degraded_query();
            degraded.push(source.to_string());
            T::default()
        }
    }
}

/// 身份没有作用域属性时，用档案中的分配补全。
fn with_profile_scope(identity: &Identity, profile: &Person) -> Identity {
    let mut identity = identity.clone();
    if identity.scope.is_empty() {
        identity.scope.assigned_hostel_id = profile
            .assigned_hostel
            .clone()
            .or_else(|| profile.hostel_id.clone());
        identity.scope.assigned_floor_ids = profile.assigned_floors.iter().cloned().collect();
    }
    identity
}

fn email_of(identity: &Identity) -> Option<&str> {
    Some(identity.email.as_str()).filter(|email| !email.is_empty())
}

impl DashboardService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// 返回身份对应角色形态的仪表盘。
    pub async fn get_dashboard(&self, identity: &Identity) -> Result<DashboardPayload, HostelError> {
        let payload = match identity.role {
            Role::ChiefWarden => self.chief_warden(identity).await?,
            Role::Supervisor | Role::HostelWarden => self.hostel_scoped(identity).await?,
            Role::FloorWarden | Role::FloorAttendant => self.floor_scoped(identity).await?,
            Role::Student => self.student(identity).await?,
        };
        record_dashboard_served();
        tracing::info!(
            target: "hostel.dashboard",
            role = %identity.role,
            issues = payload.issues().len(),
            "dashboard served"
        );
        Ok(payload)
    }

    /// 本人员工档案；不存在时返回 NotFound。
    async fn staff_profile(&self, identity: &Identity) -> Result<Person, HostelError> {
        let doc = find_profile(
            self.store.as_ref(),
            identity.role.profile_collection(),
            &identity.id,
            email_of(identity),
        )
        .await?
        .ok_or_else(|| HostelError::not_found("profile"))?;
        Ok(normalize_person(&doc.id, identity.role, &doc.data))
    }

    async fn chief_warden(&self, identity: &Identity) -> Result<DashboardPayload, HostelError> {
        let store = self.store.as_ref();
        let named = by_name();
        let all = Query::all();
        let (
            profile,
            hostels,
            supervisors,
            hostel_wardens,
            floor_wardens,
            floor_attendants,
            students,
            student_total,
            standalone,
        ) = tokio::join!(
            find_profile(store, CHIEF_WARDENS, &identity.id, email_of(identity)),
            store.query(HOSTELS, &named),
            store.query(SUPERVISORS, &named),
            store.query(HOSTEL_WARDENS, &named),
            store.query(FLOOR_WARDENS, &named),
            store.query(FLOOR_ATTENDANTS, &named),
            store.query(STUDENTS, &all),
            store.count(STUDENTS, &all),
            store.query(ISSUES, &all),
        );
        let profile = profile?.map(|doc| normalize_person(&doc.id, Role::ChiefWarden, &doc.data));
        let students = students?;

        let mut degraded = Vec::new();
        let hostels = degrade(hostels, HOSTELS, &mut degraded);
        let staff = StaffRoster {
            supervisors: people(&degrade(supervisors, SUPERVISORS, &mut degraded), Role::Supervisor),
            hostel_wardens: people(
                &degrade(hostel_wardens, HOSTEL_WARDENS, &mut degraded),
                Role::HostelWarden,
            ),
            floor_wardens: people(
                &degrade(floor_wardens, FLOOR_WARDENS, &mut degraded),
                Role::FloorWarden,
            ),
            floor_attendants: people(
                &degrade(floor_attendants, FLOOR_ATTENDANTS, &mut degraded),
                Role::FloorAttendant,
            ),
        };
        let student_total = degrade(student_total.map(Some), "students.count", &mut degraded)
            .unwrap_or(students.len() as u64);
        let standalone = degrade(standalone, ISSUES, &mut degraded);

        let issues = finalize(
            collect_issues(&students, &standalone, now_ms()),
            Role::ChiefWarden,
            &ScopePredicate::All,
        );
        Ok(DashboardPayload::ChiefWarden(ChiefWardenDashboard {
            profile,
            hostels: hostels.iter().map(HostelRecord::from_document).collect(),
            staff,
            students: people(&students, Role::Student),
            stats: DashboardStats::from_issues(student_total, &issues),
            issues,
            degraded,
        }))
    }

    async fn hostel_scoped(&self, identity: &Identity) -> Result<DashboardPayload, HostelError> {
        let role = identity.role;
        let profile = self.staff_profile(identity).await?;
        let identity = with_profile_scope(identity, &profile);
        let predicate = scope_for(&identity)?;
        let hostel_id = predicate
            .hostel_id()
            .ok_or_else(|| HostelError::forbidden("no hostel assigned"))?;

        let store = self.store.as_ref();
        let floors_query = Query::all()
            .eq("hostelId", hostel_id)
            .order_by("number", Direction::Asc);
        let named = by_name();
        let (hostel, floors, students, standalone, hostel_wardens, floor_wardens, floor_attendants) = tokio::join!(
            store.get(HOSTELS, hostel_id),
            store.query(FLOORS, &floors_query),
            scoped_students(store, &predicate),
            standalone_rows(store, &predicate),
            async {
                if role == Role::Supervisor {
                    store.query(HOSTEL_WARDENS, &by_name()).await
                } else {
                    Ok(Vec::new())
                }
            },
            store.query(FLOOR_WARDENS, &named),
            store.query(FLOOR_ATTENDANTS, &named),
        );
        let students = students?;

        let mut degraded = Vec::new();
        let hostel = degrade(hostel, HOSTELS, &mut degraded);
        let floors = degrade(floors, FLOORS, &mut degraded);
        let standalone = degrade(standalone, ISSUES, &mut degraded);
        let floor_ids: BTreeSet<String> = floors.iter().map(|doc| doc.id.clone()).collect();
        let in_hostel = |docs: Vec<Document>, staff_role: Role| -> Vec<Person> {
            people(&docs, staff_role)
                .into_iter()
                .filter(|person| predicate.admits_staff(person, &floor_ids))
                .collect()
        };
        let staff = StaffRoster {
            supervisors: Vec::new(),
            hostel_wardens: in_hostel(
                degrade(hostel_wardens, HOSTEL_WARDENS, &mut degraded),
                Role::HostelWarden,
            ),
            floor_wardens: in_hostel(
                degrade(floor_wardens, FLOOR_WARDENS, &mut degraded),
                Role::FloorWarden,
            ),
            floor_attendants: in_hostel(
                degrade(floor_attendants, FLOOR_ATTENDANTS, &mut degraded),
                Role::FloorAttendant,
            ),
        };

        let issues = finalize(collect_issues(&students, &standalone, now_ms()), role, &predicate);
        let board = HostelDashboard {
            profile,
            hostel: hostel.as_ref().map(HostelRecord::from_document),
            floors: floors.iter().map(FloorRecord::from_document).collect(),
            staff,
            stats: DashboardStats::from_issues(students.len() as u64, &issues),
            students: people(&students, Role::Student),
            issues,
            degraded,
        };
        Ok(match role {
            Role::Supervisor => DashboardPayload::Supervisor(board),
            _ => DashboardPayload::HostelWarden(board),
        })
    }

    async fn floor_scoped(&self, identity: &Identity) -> Result<DashboardPayload, HostelError> {
        let role = identity.role;
        let profile = self.staff_profile(identity).await?;
        let identity = with_profile_scope(identity, &profile);
        let predicate = scope_for(&identity)?;
        let floor_ids = predicate
            .floor_ids()
            .cloned()
            .ok_or_else(|| HostelError::forbidden("no floors assigned"))?;

        let store = self.store.as_ref();
        let rooms_query = Query::all().is_in("floorId", floor_ids.iter().map(String::as_str));
        let all = Query::all();
        let (floors, rooms, students, standalone, floor_attendants) = tokio::join!(
            store.query(FLOORS, &all),
            store.query(ROOMS, &rooms_query),
            scoped_students(store, &predicate),
            standalone_rows(store, &predicate),
            async {
                if role == Role::FloorWarden {
                    store.query(FLOOR_ATTENDANTS, &by_name()).await
                } else {
                    Ok(Vec::new())
                }
            },
        );
        let students = students?;

        let mut degraded = Vec::new();
        let floors = degrade(floors, FLOORS, &mut degraded);
        let rooms = degrade(rooms, ROOMS, &mut degraded);
        let standalone = degrade(standalone, ISSUES, &mut degraded);
        let floor_attendants: Vec<Person> = people(
            &degrade(floor_attendants, FLOOR_ATTENDANTS, &mut degraded),
            Role::FloorAttendant,
        )
        .into_iter()
        .filter(|person| predicate.admits(person))
        .collect();

        let issues = finalize(collect_issues(&students, &standalone, now_ms()), role, &predicate);
        let board = FloorDashboard {
            profile,
            floors: floors
                .iter()
                .filter(|doc| floor_ids.contains(&doc.id))
                .map(FloorRecord::from_document)
                .collect(),
            rooms: rooms.iter().map(RoomRecord::from_document).collect(),
            floor_attendants,
            stats: DashboardStats::from_issues(students.len() as u64, &issues),
            students: people(&students, Role::Student),
            issues,
            degraded,
        };
        Ok(match role {
            Role::FloorWarden => DashboardPayload::FloorWarden(board),
            _ => DashboardPayload::FloorAttendant(board),
        })
    }

    async fn student(&self, identity: &Identity) -> Result<DashboardPayload, HostelError> {
        let store = self.store.as_ref();
        let Some(doc) = find_profile(store, STUDENTS, &identity.id, email_of(identity)).await?
        else {
            return Ok(DashboardPayload::Student(StudentDashboard {
                profile: None,
                issues: Vec::new(),
                stats: DashboardStats::default(),
                degraded: Vec::new(),
            }));
        };
        let mut degraded = Vec::new();
        let issues = self.own_issues(identity, &doc, &mut degraded).await;
        Ok(DashboardPayload::Student(StudentDashboard {
            profile: Some(normalize_person(&doc.id, Role::Student, &doc.data)),
            stats: DashboardStats::from_issues(1, &issues),
            issues,
            degraded,
        }))
    }

    /// 学生本人的工单。按邮箱找到的档案 ID 与登录身份 ID 不同时，
    /// 两者关联的独立集合行都归属本人。
    pub(crate) async fn own_issues(
        &self,
        identity: &Identity,
        doc: &Document,
        degraded: &mut Vec<String>,
    ) -> Vec<Issue> {
        let mut owner_ids = vec![doc.id.as_str()];
        if identity.id != doc.id {
            owner_ids.push(identity.id.as_str());
        }
        let standalone = degrade(own_rows(self.store.as_ref(), &owner_ids).await, ISSUES, degraded);
        finalize(
            collect_student_issues(doc, &owner_ids, &standalone, now_ms()),
            Role::Student,
            &ScopePredicate::SelfOnly(doc.id.clone()),
        )
    }
}
