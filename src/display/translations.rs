//! Display strings in Thai and English

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Th,
    En,
}

/// Fixed labels shown on the display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message {
    ExamInfo,
    CourseCode,
    CourseName,
    Lecture,
    Lab,
    ExamTime,
    ExamRoom,
    Remarks,
    Footer,
    ExamRules,
    ExamRuleSubmission,
    ExamRuleCommunication,
}

impl Message {
    pub const ALL: [Message; 12] = [
        Message::ExamInfo,
        Message::CourseCode,
        Message::CourseName,
        Message::Lecture,
        Message::Lab,
        Message::ExamTime,
        Message::ExamRoom,
        Message::Remarks,
        Message::Footer,
        Message::ExamRules,
        Message::ExamRuleSubmission,
        Message::ExamRuleCommunication,
    ];

    pub fn text(self, language: Language) -> &'static str {
        use Language::{En, Th};

        match (self, language) {
            (Message::ExamInfo, Th) => "ข้อมูลการสอบ",
            (Message::ExamInfo, En) => "Exam Information",
            (Message::CourseCode, Th) => "รหัสวิชา",
            (Message::CourseCode, En) => "Course Code",
            (Message::CourseName, Th) => "ชื่อวิชา",
            (Message::CourseName, En) => "Course Name",
            (Message::Lecture, Th) => "หมู่บรรยาย",
            (Message::Lecture, En) => "Lecture Section",
            (Message::Lab, Th) => "หมู่ปฏิบัติ",
            (Message::Lab, En) => "Lab Section",
            (Message::ExamTime, Th) => "เวลาสอบ",
            (Message::ExamTime, En) => "Exam Time",
            (Message::ExamRoom, Th) => "ห้องสอบ",
            (Message::ExamRoom, En) => "Exam Room",
            (Message::Remarks, Th) => "หมายเหตุ",
            (Message::Remarks, En) => "Remarks",
            (Message::Footer, Th) => "นาฬิกาดิจิทัลสำหรับห้องสอบ",
            (Message::Footer, En) => "Digital Clock for Exam Room",
            (Message::ExamRules, Th) => "กฎกติกาการสอบ",
            (Message::ExamRules, En) => "Exam Rules",
            (Message::ExamRuleSubmission, Th) => {
                "นิสิตสามารถส่งข้อสอบได้เมื่อเวลาผ่านไป 1 ชั่วโมง"
            }
            (Message::ExamRuleSubmission, En) => {
                "Students can submit the exam papers after 1 hour of the starting time of the exam."
            }
            (Message::ExamRuleCommunication, Th) => {
                "ไม่อนุญาตให้นำเครื่องมือสื่อสารทุกชนิดเข้าห้องสอบ"
            }
            (Message::ExamRuleCommunication, En) => {
                "Communication devices of any kind are not allowed into the exam room."
            }
        }
    }
}

/// Spoken text for a minute-mark alert
pub fn announcement(minutes_left: u64, language: Language) -> String {
    match language {
        Language::Th => format!("เหลือเวลาสอบอีก {} นาที", minutes_left),
        Language::En if minutes_left == 1 => "1 minute remaining".to_string(),
        Language::En => format!("{} minutes remaining", minutes_left),
    }
}
