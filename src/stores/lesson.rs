//! Lesson position and the code-editor content that goes with it.
//!
//! DESIGN
//! ======
//! The current step is teacher-owned. Students ingest remote step changes
//! only while focus mode is on; with focus off they browse on their own and
//! the teacher's step is ignored until focus comes back. That gate sits on
//! the synced value itself, so both change-detection paths honour it.
//!
//! Navigation (`next_step`, `prev_step`, `go_to_step`) clamps to the
//! catalogue and resets the editor to the new step's template. The teacher's
//! navigation is persisted; a student's only moves the local mirror.
//! `set_current_step` is the raw teacher setter and is not clamped.
//!
//! The editor content is written by whichever context is editing, so it is
//! open to every role and never polled.

#[cfg(test)]
#[path = "lesson_test.rs"]
mod lesson_test;

use std::rc::Rc;

use tracing::debug;

use crate::codec::{IntegerCodec, TextCodec};
use crate::config::SyncOptions;
use crate::keys;
use crate::role::RoleGate;
use crate::stores::focus::FocusStore;
use crate::synced::{SyncEnv, SyncedValue, WritePolicy};

// =============================================================================
// CATALOGUE
// =============================================================================

const JAVA_FREE_STYLE: &str = "public class Main {
    public static void main(String[] args) {
        // 자유롭게 코드를 작성해보세요

    }
}";

const JAVA_HELLO_WORLD: &str = "public class Main {
    public static void main(String[] args) {
        // System.out.println()을 사용하여 \"Hello World\"를 출력하세요

    }
}";

const JAVA_VARIABLES: &str = "public class Main {
    public static void main(String[] args) {
        // 정수형 변수 age 선언 (값: 25)

        // 실수형 변수 price 선언 (값: 19.99)

        // 문자열 변수 name 선언 (값: \"홍길동\")

        // 각 변수를 출력하세요

    }
}";

const JAVA_IF_ELSE: &str = "public class Main {
    public static void main(String[] args) {
        int score = 85;

        // 90점 이상: \"A 학점\"
        // 80점 이상: \"B 학점\"
        // 70점 이상: \"C 학점\"
        // 그 외: \"재시험\"

    }
}";

const JAVA_FOR_LOOP: &str = "public class Main {
    public static void main(String[] args) {
        // for 반복문을 사용하여 1부터 10까지 출력하세요

    }
}";

/// Shown for steps the catalogue has no task for.
pub const MISSING_DESCRIPTION: &str = "과제 내용을 준비 중입니다.";

/// One step's task: what to do and the code the editor starts from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LessonTask {
    pub description: String,
    pub initial_code: String,
}

/// Ordered lesson tasks. Step `n` is the `n`th entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LessonCatalog {
    tasks: Vec<LessonTask>,
}

impl LessonCatalog {
    #[must_use]
    pub fn new(tasks: Vec<LessonTask>) -> Self {
        Self { tasks }
    }

    #[must_use]
    pub fn total_steps(&self) -> i64 {
        i64::try_from(self.tasks.len()).unwrap_or(i64::MAX)
    }

    fn task(&self, step: i64) -> Option<&LessonTask> {
        match usize::try_from(step) {
            Ok(index) => self.tasks.get(index),
            Err(_) => None,
        }
    }

    /// Template for `step`, or empty for an unknown step.
    #[must_use]
    pub fn initial_code(&self, step: i64) -> String {
        self.task(step).map(|t| t.initial_code.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn description(&self, step: i64) -> String {
        self.task(step)
            .map_or_else(|| MISSING_DESCRIPTION.to_owned(), |t| t.description.clone())
    }
}

impl Default for LessonCatalog {
    /// The five-step introductory Java course.
    fn default() -> Self {
        let task = |description: &str, code: &str| LessonTask {
            description: description.to_owned(),
            initial_code: code.to_owned(),
        };
        Self::new(vec![
            task("자유롭게 코드를 작성해보세요. 자바의 기본 구조를 익혀봅시다.", JAVA_FREE_STYLE),
            task(
                "System.out.println을 사용하여 콘솔에 \"Hello World\"를 출력하세요.",
                JAVA_HELLO_WORLD,
            ),
            task("정수, 실수, 문자열 타입의 변수를 각각 선언하고 출력하세요.", JAVA_VARIABLES),
            task(
                "점수(score = 85)를 기준으로 학점을 출력하는 if-else 문을 작성하세요.",
                JAVA_IF_ELSE,
            ),
            task("for 반복문을 사용하여 1부터 10까지의 숫자를 출력하세요.", JAVA_FOR_LOOP),
        ])
    }
}

// =============================================================================
// STORE
// =============================================================================

pub struct LessonStore {
    gate: RoleGate,
    catalog: Rc<LessonCatalog>,
    current_step: SyncedValue<i64>,
    code_content: SyncedValue<String>,
}

impl LessonStore {
    #[must_use]
    pub fn new(env: &SyncEnv, gate: &RoleGate, focus: &FocusStore, catalog: Rc<LessonCatalog>) -> Self {
        let focus_mode = focus.focus_mode_value();
        let step_gate = gate.clone();
        let current_step = SyncedValue::new(
            env,
            keys::CURRENT_LESSON_STEP,
            0,
            IntegerCodec,
            WritePolicy::Privileged(gate.clone()),
            env.options(),
        )
        .with_sync_gate(move || !step_gate.is_privileged() && focus_mode.read());

        let template = catalog.initial_code(current_step.read());
        let code_content = SyncedValue::new(
            env,
            keys::LESSON_CODE,
            template.clone(),
            TextCodec,
            WritePolicy::Open,
            SyncOptions::local(),
        );
        // An empty stored editor counts as no stored editor.
        if code_content.with(String::is_empty) {
            code_content.set_local(template);
        }

        Self { gate: gate.clone(), catalog, current_step, code_content }
    }

    #[must_use]
    pub fn current_step(&self) -> i64 {
        self.current_step.read()
    }

    /// Shared handle on the step, for stores keyed by it.
    #[must_use]
    pub fn current_step_value(&self) -> SyncedValue<i64> {
        self.current_step.clone()
    }

    #[must_use]
    pub fn total_steps(&self) -> i64 {
        self.catalog.total_steps()
    }

    #[must_use]
    pub fn catalog(&self) -> &LessonCatalog {
        &self.catalog
    }

    /// Template for the current step.
    #[must_use]
    pub fn current_template(&self) -> String {
        self.catalog.initial_code(self.current_step())
    }

    #[must_use]
    pub fn current_description(&self) -> String {
        self.catalog.description(self.current_step())
    }

    #[must_use]
    pub fn code_content(&self) -> String {
        self.code_content.read()
    }

    pub fn set_code_content(&self, code: &str) {
        self.code_content.write(code.to_owned());
    }

    /// Raw teacher setter. Not clamped.
    pub fn set_current_step(&self, step: i64) {
        self.current_step.write(step);
    }

    pub fn next_step(&self) {
        let step = self.current_step();
        if step < self.total_steps() - 1 {
            self.move_to(step + 1);
        }
    }

    pub fn prev_step(&self) {
        let step = self.current_step();
        if step > 0 {
            self.move_to(step - 1);
        }
    }

    pub fn go_to_step(&self, step: i64) {
        if (0..self.total_steps()).contains(&step) {
            self.move_to(step);
        }
    }

    fn move_to(&self, step: i64) {
        if self.gate.is_privileged() {
            self.current_step.write(step);
        } else {
            self.current_step.set_local(step);
        }
        self.code_content.write(self.catalog.initial_code(step));
        debug!(step, "lesson step changed");
    }

    pub fn stop_polling(&self) {
        self.current_step.stop();
        self.code_content.stop();
    }
}
