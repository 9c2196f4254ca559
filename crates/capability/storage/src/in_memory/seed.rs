//! 演示数据
//!
//! 未配置数据库时，内存存储以一栋楼、两层楼层和几名学生启动，
//! 学生文档刻意混用新旧两种工单形态（issues 与 complaints/maintenance）。

use super::document::InMemoryDocumentStore;
use domain::collections;
use serde_json::json;

/// 写入演示数据
pub fn seed_demo(store: &InMemoryDocumentStore) {
    store.insert(
        collections::HOSTELS,
        "H1",
        json!({ "name": "Aravali", "totalFloors": 2, "totalRooms": 4 }),
    );
    for (floor_id, number) in [("H1-F1", 1), ("H1-F2", 2)] {
        store.insert(
            collections::FLOORS,
            floor_id,
            json!({ "hostelId": "H1", "number": number, "totalRooms": 2 }),
        );
    }
    for (room_id, floor_id) in [
        ("H1-101", "H1-F1"),
        ("H1-102", "H1-F1"),
        ("H1-201", "H1-F2"),
        ("H1-202", "H1-F2"),
    ] {
        store.insert(
            collections::ROOMS,
            room_id,
            json!({ "hostelId": "H1", "floorId": floor_id, "number": room_id, "images": [] }),
        );
    }

    store.insert(
        collections::CHIEF_WARDENS,
        "chief-1",
        json!({ "name": "Meera Rao", "email": "chief@hostel.test" }),
    );
    store.insert(
        collections::HOSTEL_WARDENS,
        "hw-1",
        json!({
            "name": "Vikram Sethi",
            "email": "hw@hostel.test",
            "assignedHostel": "H1",
            "reportsTo": "chief-1"
        }),
    );
    store.insert(
        collections::FLOOR_WARDENS,
        "fw-1",
        json!({
            "name": "Anita Das",
            "email": "fw@hostel.test",
            "assignedFloors": ["H1-F1"],
            "reportsTo": "hw-1"
        }),
    );
    store.insert(
        collections::FLOOR_ATTENDANTS,
        "fa-1",
        json!({
            "name": "Ravi Kumar",
            "email": "fa@hostel.test",
            "assignedFloors": ["H1-F1", "H1-F2"],
            "reportsTo": "fw-1"
        }),
    );

    store.insert(
        collections::STUDENTS,
        "stu-1",
        json!({
            "name": "Asha Verma",
            "email": "asha@hostel.test",
            "registrationNumber": "21BCE1001",
            "course": "B.Tech CSE",
            "hostelId": "H1",
            "floorId": "H1-F1",
            "room": "H1-101",
            "issues": [{
                "id": "iss-1",
                "type": "maintenance",
                "category": "electrical",
                "message": "Tube light flickering",
                "timestamp": { "_seconds": 1_717_000_000, "_nanoseconds": 0 },
                "solved": false
            }]
        }),
    );
    store.insert(
        collections::STUDENTS,
        "stu-2",
        json!({
            "name": "Kabir Singh",
            "email": "kabir@hostel.test",
            "registrationNumber": "21BME1002",
            "course": "B.Tech ME",
            "hostelDetails": { "hostelId": "H1", "floor": "H1-F2", "room": "H1-201" },
            "complaints": [{
                "id": "iss-2",
                "message": "Loud music after midnight",
                "date": "2024-05-30T22:15:00Z",
                "isSolved": true
            }],
            "maintenance": [{
                "id": "iss-3",
                "category": "plumbing",
                "message": "Leaking tap",
                "date": "2024-06-01T08:00:00Z"
            }]
        }),
    );
}
