use crate::ScopePredicate;
use domain::Role;
use domain::collections::{FLOORS, STUDENTS};
use hostel_normalize::normalize_person;
use hostel_storage::{Document, DocumentStore, Query, StorageError};
use std::collections::{BTreeMap, BTreeSet};

/// 读取范围内的学生文档（按 ID 排序）。
///
/// 楼宇范围分别查询 `hostelId` 与 `hostelDetails.hostelId`；
/// 楼层范围分别查询 `floorId`、`floor`、`hostelDetails.floor` 与 `hostelDetails.floorId`；
/// 各查询并行执行，结果按 ID 合并后再用谓词复核。
pub async fn scoped_students(
    store: &dyn DocumentStore,
    predicate: &ScopePredicate,
) -> Result<Vec<Document>, StorageError> {
    let documents = match predicate {
        ScopePredicate::All => store.query(STUDENTS, &Query::all()).await?,
        ScopePredicate::Hostel(hostel) => {
            let direct = Query::all().eq("hostelId", hostel.as_str());
            let nested = Query::all().eq("hostelDetails.hostelId", hostel.as_str());
            let (direct, nested) =
                tokio::join!(store.query(STUDENTS, &direct), store.query(STUDENTS, &nested));
            merge_by_id([direct?, nested?])
        }
        ScopePredicate::Floors(floors) => {
            let values: Vec<&str> = floors.iter().map(String::as_str).collect();
            let by_floor_id = Query::all().is_in("floorId", values.iter().copied());
            let by_floor = Query::all().is_in("floor", values.iter().copied());
            let by_details = Query::all().is_in("hostelDetails.floor", values.iter().copied());
            let by_details_id =
                Query::all().is_in("hostelDetails.floorId", values.iter().copied());
            let (by_floor_id, by_floor, by_details, by_details_id) = tokio::join!(
                store.query(STUDENTS, &by_floor_id),
                store.query(STUDENTS, &by_floor),
                store.query(STUDENTS, &by_details),
                store.query(STUDENTS, &by_details_id),
            );
            merge_by_id([by_floor_id?, by_floor?, by_details?, by_details_id?])
        }
        ScopePredicate::SelfOnly(id) => store.get(STUDENTS, id).await?.into_iter().collect(),
    };
    Ok(documents
        .into_iter()
        .filter(|doc| predicate.admits(&normalize_person(&doc.id, Role::Student, &doc.data)))
        .collect())
}

/// 楼宇范围下该楼宇的全部楼层 ID；其他范围返回空集合。
pub async fn scope_floor_ids(
    store: &dyn DocumentStore,
    predicate: &ScopePredicate,
) -> Result<BTreeSet<String>, StorageError> {
    let Some(hostel) = predicate.hostel_id() else {
        return Ok(BTreeSet::new());
    };
    Ok(store
        .query(FLOORS, &Query::all().eq("hostelId", hostel))
        .await?
        .into_iter()
        .map(|doc| doc.id)
        .collect())
}

fn merge_by_id<const N: usize>(batches: [Vec<Document>; N]) -> Vec<Document> {
    let mut merged = BTreeMap::new();
    for doc in batches.into_iter().flatten() {
        merged.entry(doc.id.clone()).or_insert(doc);
    }
    merged.into_values().collect()
}

/// 按 ID 查找档案，找不到时按邮箱回退（首个匹配）。
pub async fn find_profile(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
    email: Option<&str>,
) -> Result<Option<Document>, StorageError> {
    if let Some(document) = store.get(collection, id).await? {
        return Ok(Some(document));
    }
    let Some(email) = email.map(str::trim).filter(|email| !email.is_empty()) else {
        return Ok(None);
    };
    Ok(store
        .query(collection, &Query::all().eq("email", email).limit(1))
        .await?
        .into_iter()
        .next())
}
