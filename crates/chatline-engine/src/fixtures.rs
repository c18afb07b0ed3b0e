use chatline_core::config::parse_rules;
use chatline_core::model::RuleTable;

pub const SAMPLE_CONFIG: &str = r#"{
    "agents": ["Max", "Zoe", "Sam"],
    "responses": {
        "keywords": {
            "cafe": {
                "general": [
                    "The cafe serves hot food until 3pm.",
                    "Try the campus cafe's flat white."
                ],
                "directions": [
                    "The cafe is next to the main hall.",
                    "Take the second left after reception."
                ]
            },
            "library": {
                "general": ["The library is open 24/7 during exams."],
                "directions": ["The library is behind the science block."]
            },
            "book": {"general": ["The library has over a million books."]},
            "study": {"general": ["Quiet study rooms are on level 2."]},
            "programming": {
                "general": ["Programming clubs meet on Thursdays."],
                "python": ["Python is great for beginners."],
                "javascript": ["JavaScript runs in every browser."],
                "java": ["Java is taught in the first year."],
                "c++": ["C++ gives you control over memory."]
            }
        },
        "multi_word_responses": {
            "opening hours": "The campus is open from 8am to 10pm.",
            "exam timetable": "Exam timetables are on the student portal."
        },
        "random_responses": [
            "I'm not sure about that, {username}.",
            "Could you rephrase that, {username}?"
        ]
    },
    "exit_commands": ["bye", "exit", "quit"]
}"#;

pub fn sample_rules() -> RuleTable {
    parse_rules(SAMPLE_CONFIG).unwrap()
}
