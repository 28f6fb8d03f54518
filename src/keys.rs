//! Logical storage keys. The channel prefix is applied on top of these.

pub const IS_TEACHER: &str = "isTeacher";
pub const TEACHER_NAME: &str = "teacherName";

pub const FOCUS_MODE: &str = "focusMode";
pub const SPLIT_PERCENT: &str = "splitPercent";
pub const CONTENT_SCROLL_POSITION: &str = "contentScrollPosition";
pub const CONTENT_PANE_WIDTH: &str = "contentPaneWidth";

pub const CURRENT_LESSON_STEP: &str = "currentLessonStep";
pub const LESSON_CODE: &str = "lessonCode";

pub const SHARE_CODE_EDITOR: &str = "shareCodeEditor";
pub const CODE_CONTENT: &str = "codeContent";
pub const SHARED_STUDENT_ID: &str = "sharedStudentId";
pub const SHARED_STUDENT_NAME: &str = "sharedStudentName";
pub const SHARED_STUDENT_CODE: &str = "sharedStudentCode";
pub const TEACHER_CURSOR: &str = "teacherCursor";

pub const STUDENTS: &str = "students";
pub const STUDENT_CODE_SUFFIX: &str = "code";
pub const STUDENT_CURSOR_SUFFIX: &str = "cursor";

pub const WHITEBOARD_PATHS: &str = "whiteboardPaths";
pub const WHITEBOARD_ACTIVE: &str = "whiteboardActive";
pub const CURRENT_DRAWING_PATH: &str = "currentDrawingPath";

pub const CHAT_MESSAGES: &str = "chatMessages";
