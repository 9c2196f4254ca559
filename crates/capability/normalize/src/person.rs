//! 人员档案标准化。

use crate::fields::{first_text, nested_text, text_list};
use domain::{Person, Role};
use serde_json::{Map, Value};

/// 楼宇 ID：`hostelId` → `hostelDetails.hostelId` → `assignedHostel`。
pub fn hostel_of(data: &Map<String, Value>) -> Option<String> {
    first_text(data, &["hostelId"])
        .or_else(|| nested_text(data, "hostelDetails", &["hostelId"]))
        .or_else(|| first_text(data, &["assignedHostel"]))
}

/// 楼层 ID：`floorId` → `floor` → `hostelDetails.floor` → `hostelDetails.floorId`。
pub fn floor_of(data: &Map<String, Value>) -> Option<String> {
    first_text(data, &["floorId", "floor"])
        .or_else(|| nested_text(data, "hostelDetails", &["floor", "floorId"]))
}

/// 房间：`room` → `hostelDetails.room` → `roomNumber`。
pub fn room_of(data: &Map<String, Value>) -> Option<String> {
    first_text(data, &["room"])
        .or_else(|| nested_text(data, "hostelDetails", &["room", "roomNumber"]))
        .or_else(|| first_text(data, &["roomNumber"]))
}

/// 标准化人员文档。
pub fn normalize_person(id: &str, role: Role, data: &Map<String, Value>) -> Person {
    let assigned_hostel = first_text(data, &["assignedHostel"]).or_else(|| {
        role.is_hostel_scoped()
            .then(|| first_text(data, &["hostelId"]))
            .flatten()
    });
    let assigned_floors = if role.is_floor_scoped() {
        text_list(data, &["assignedFloors", "assignedFloor", "floorIds"])
    } else {
        text_list(data, &["assignedFloors"])
    };

    Person {
        id: id.to_string(),
        role,
        name: first_text(data, &["name", "displayName", "fullName"]).unwrap_or_default(),
        email: first_text(data, &["email"]),
        phone: first_text(data, &["phone", "phoneNumber", "contact"]),
        registration_number: first_text(data, &["registrationNumber", "regNo"]),
        course: first_text(data, &["course"]),
        hostel_id: hostel_of(data),
        hostel: first_text(data, &["hostel", "hostelName"])
            .or_else(|| nested_text(data, "hostelDetails", &["hostel", "hostelName"])),
        floor_id: floor_of(data),
        room: room_of(data),
        assigned_hostel,
        assigned_floors,
        reports_to: first_text(data, &["reportsTo"]),
    }
}
