//! 人员与楼宇目录：学生、员工、楼宇、楼层、房间的范围内读取与员工创建。

use domain::collections::{FLOORS, HOSTELS, ROOMS, STUDENTS};
use domain::{HostelError, Identity, Person, Role};
use hostel_normalize::fields::{first_text, text_list};
use hostel_normalize::{normalize_person, now_ms};
use hostel_scope::{ScopePredicate, scope_floor_ids, scope_for, scoped_students};
use hostel_storage::{Direction, Document, DocumentStore, Query};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::sync::Arc;

/// 楼宇记录。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostelRecord {
    pub id: String,
    pub name: String,
    pub total_floors: Option<u64>,
    pub total_rooms: Option<u64>,
}

impl HostelRecord {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            name: first_text(&doc.data, &["name"]).unwrap_or_else(|| doc.id.clone()),
            total_floors: doc.field("totalFloors").and_then(Value::as_u64),
            total_rooms: doc.field("totalRooms").and_then(Value::as_u64),
        }
    }
}

/// 楼层记录。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorRecord {
    pub id: String,
    pub hostel_id: Option<String>,
    pub number: Option<i64>,
    pub total_rooms: Option<u64>,
}

impl FloorRecord {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            hostel_id: first_text(&doc.data, &["hostelId"]),
            number: doc.field("number").and_then(Value::as_i64),
            total_rooms: doc.field("totalRooms").and_then(Value::as_u64),
        }
    }
}

/// 房间记录。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRecord {
    pub id: String,
    pub hostel_id: Option<String>,
    pub floor_id: Option<String>,
    pub number: Option<String>,
    pub images: Vec<String>,
}

impl RoomRecord {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            hostel_id: first_text(&doc.data, &["hostelId"]),
            floor_id: first_text(&doc.data, &["floorId", "floor"]),
            number: first_text(&doc.data, &["number", "roomNumber"]),
            images: text_list(&doc.data, &["images"]),
        }
    }
}

/// 员工创建参数（必填字段已由调用方校验）。
#[derive(Debug, Clone, Default)]
pub struct NewStaff {
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub assigned_hostel: Option<String>,
    pub assigned_floors: Vec<String>,
    pub reports_to: Option<String>,
}

/// 按姓名排序的全集合查询。
pub(crate) fn by_name() -> Query {
    Query::all().order_by("name", Direction::Asc)
}

pub(crate) fn people(docs: &[Document], role: Role) -> Vec<Person> {
    docs.iter()
        .map(|doc| normalize_person(&doc.id, role, &doc.data))
        .collect()
}

/// 目录服务。
pub struct DirectoryService {
    store: Arc<dyn DocumentStore>,
}

impl DirectoryService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// 范围内学生列表。
    pub async fn list_students(&self, identity: &Identity) -> Result<Vec<Person>, HostelError> {
        let predicate = scope_for(identity)?;
        let docs = scoped_students(self.store.as_ref(), &predicate).await?;
        let mut students = people(&docs, Role::Student);
        students.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(students)
    }

    /// 单个学生；不存在或不在范围内统一返回 NotFound。
    pub async fn get_student(&self, identity: &Identity, id: &str) -> Result<Person, HostelError> {
        let predicate = scope_for(identity)?;
        let doc = self
            .store
            .get(STUDENTS, id)
            .await?
            .ok_or_else(|| HostelError::not_found("student"))?;
        let person = normalize_person(&doc.id, Role::Student, &doc.data);
        if !predicate.admits(&person) {
            return Err(HostelError::not_found("student"));
        }
        Ok(person)
    }

    /// 范围内某类员工列表。
    pub async fn list_staff(&self, identity: &Identity, role: Role) -> Result<Vec<Person>, HostelError> {
        if !role.is_staff() {
            return Err(HostelError::invalid("role"));
        }
        let predicate = scope_for(identity)?;
        let store = self.store.as_ref();
        let named = by_name();
        let (docs, hostel_floors) = tokio::join!(
            store.query(role.profile_collection(), &named),
            scope_floor_ids(store, &predicate),
        );
        let hostel_floors = hostel_floors?;
        Ok(people(&docs?, role)
            .into_iter()
            .filter(|person| predicate.admits_staff(person, &hostel_floors))
            .collect())
    }

    /// 创建员工档案。
    ///
    /// 楼宇角色必须分配楼宇，楼层角色必须分配至少一个楼层；
    /// 分配目标必须存在且位于创建者范围内。
    pub async fn create_staff(
        &self,
        identity: &Identity,
        role: Role,
        new: NewStaff,
    ) -> Result<Person, HostelError> {
        if !role.is_staff() {
            return Err(HostelError::invalid("role"));
        }
        let predicate = scope_for(identity)?;
        let mut data = Map::new();
        data.insert("name".to_string(), Value::from(new.name));
        data.insert("email".to_string(), Value::from(new.email));
        if let Some(phone) = new.phone {
            data.insert("phone".to_string(), Value::from(phone));
        }

        if role.is_hostel_scoped() {
            let hostel = new
                .assigned_hostel
                .map(|hostel| hostel.trim().to_string())
                .filter(|hostel| !hostel.is_empty())
                .ok_or_else(|| HostelError::invalid("assignedHostel"))?;
            if self.store.get(HOSTELS, &hostel).await?.is_none() {
                return Err(HostelError::invalid(format!("unknown hostel: {hostel}")));
            }
            if !predicate.admits_location(Some(&hostel), None) {
                return Err(HostelError::forbidden("hostel outside your scope"));
            }
            data.insert("assignedHostel".to_string(), Value::from(hostel));
        } else {
            let floors: BTreeSet<String> = new
                .assigned_floors
                .iter()
                .map(|floor| floor.trim().to_string())
                .filter(|floor| !floor.is_empty())
                .collect();
            if floors.is_empty() {
                return Err(HostelError::invalid("assignedFloors"));
            }
            for floor in &floors {
                let doc = self
                    .store
                    .get(FLOORS, floor)
                    .await?
                    .ok_or_else(|| HostelError::invalid(format!("unknown floor: {floor}")))?;
                let hostel = first_text(&doc.data, &["hostelId"]);
                if !predicate.admits_location(hostel.as_deref(), Some(floor)) {
                    return Err(HostelError::forbidden("floor outside your scope"));
                }
            }
            data.insert(
                "assignedFloors".to_string(),
                Value::Array(floors.into_iter().map(Value::from).collect()),
            );
        }

        let id = new
            .id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let collection = role.profile_collection();
        if self.store.get(collection, &id).await?.is_some() {
            return Err(HostelError::invalid("staff id already exists"));
        }
        data.insert(
            "reportsTo".to_string(),
            Value::from(new.reports_to.unwrap_or_else(|| identity.id.clone())),
        );
        data.insert("createdAt".to_string(), Value::from(now_ms()));
        self.store.set(collection, &id, data.clone()).await?;
        tracing::info!(target: "hostel.directory", staff_id = %id, role = %role, created_by = %identity.id, "staff created");
        Ok(normalize_person(&id, role, &data))
    }

    /// 范围内楼宇。
    pub async fn list_hostels(&self, identity: &Identity) -> Result<Vec<HostelRecord>, HostelError> {
        match scope_for(identity)? {
            ScopePredicate::All => Ok(self
                .store
                .query(HOSTELS, &by_name())
                .await?
                .iter()
                .map(HostelRecord::from_document)
                .collect()),
            ScopePredicate::Hostel(hostel) => Ok(self
                .store
                .get(HOSTELS, &hostel)
                .await?
                .iter()
                .map(HostelRecord::from_document)
                .collect()),
            _ => Err(HostelError::forbidden("hostels are not visible to your role")),
        }
    }

    /// 楼宇下的楼层（按楼层号排序）。
    pub async fn list_floors(
        &self,
        identity: &Identity,
        hostel_id: &str,
    ) -> Result<Vec<FloorRecord>, HostelError> {
        let predicate = scope_for(identity)?;
        if !matches!(predicate, ScopePredicate::All | ScopePredicate::Hostel(_))
            || !predicate.admits_location(Some(hostel_id), None)
        {
            return Err(HostelError::not_found("hostel"));
        }
        let floors = self
            .store
            .query(
                FLOORS,
                &Query::all()
                    .eq("hostelId", hostel_id)
                    .order_by("number", Direction::Asc),
            )
            .await?;
        Ok(floors.iter().map(FloorRecord::from_document).collect())
    }

    /// 范围内房间。
    pub async fn list_rooms(&self, identity: &Identity) -> Result<Vec<RoomRecord>, HostelError> {
        let query = match scope_for(identity)? {
            ScopePredicate::All => Query::all(),
            ScopePredicate::Hostel(hostel) => Query::all().eq("hostelId", hostel),
            ScopePredicate::Floors(floors) => Query::all().is_in("floorId", floors),
            ScopePredicate::SelfOnly(_) => {
                return Err(HostelError::forbidden("rooms are not visible to your role"));
            }
        };
        let rooms = self.store.query(ROOMS, &query).await?;
        Ok(rooms.iter().map(RoomRecord::from_document).collect())
    }

    /// 范围内的单个房间。
    pub async fn room_in_scope(
        &self,
        identity: &Identity,
        room_id: &str,
    ) -> Result<RoomRecord, HostelError> {
        let predicate = scope_for(identity)?;
        let room = self
            .store
            .get(ROOMS, room_id)
            .await?
            .map(|doc| RoomRecord::from_document(&doc))
            .ok_or_else(|| HostelError::not_found("room"))?;
        if !predicate.admits_location(room.hostel_id.as_deref(), room.floor_id.as_deref()) {
            return Err(HostelError::not_found("room"));
        }
        Ok(room)
    }

    /// 追加房间图片 URL，返回最新图片列表。
    pub async fn append_room_image(&self, room_id: &str, url: &str) -> Result<Vec<String>, HostelError> {
        let appended = self
            .store
            .array_union(ROOMS, room_id, "images", vec![Value::from(url)])
            .await?;
        if !appended {
            return Err(HostelError::not_found("room"));
        }
        let room = self
            .store
            .get(ROOMS, room_id)
            .await?
            .ok_or_else(|| HostelError::not_found("room"))?;
        Ok(RoomRecord::from_document(&room).images)
    }
}
