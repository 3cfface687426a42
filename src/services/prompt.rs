//! Prompt Builder
//!
//! Renders the generation prompt for one intake record. The section headings
//! come from `SectionLabel` so the prompt and the parser cannot disagree.

use saju_intake_core::{normalize_birthdate, SectionLabel};

use crate::models::intake::IntakeRecord;

const BIRTHTIME_PLACEHOLDER: &str = "(미입력)";
const MEMO_PLACEHOLDER: &str = "(없음)";

const PREAMBLE: &str = "당신은 한국어로 답하는 '사주 기반 라이프스타일 안내' 작성자입니다.
아래 고객 입력을 바탕으로, 사주/오행을 \"재미+참고용\"으로만 해석해 주세요.
의학적 진단/치료 표현은 금지하고, 생활 습관/식습관 조언 수준으로만 작성하세요.";

const SECTIONS_INTRO: &str =
    "아래 섹션 제목을 정확히 사용하여 출력하세요. 섹션 제목은 반드시 대괄호로 감싸주세요:";

fn section_guide(label: SectionLabel) -> &'static str {
    match label {
        SectionLabel::Summary => "5~7줄, 성향/강점/주의점 중심으로 작성",
        SectionLabel::Health => "4~6줄, 생활습관 조언 중심(의학적 표현 금지)",
        SectionLabel::Foods => {
            "- 추천음식1: 이유\n- 추천음식2: 이유\n- 추천음식3: 이유\n- 추천음식4: 이유\n- 추천음식5: 이유"
        }
        SectionLabel::Avoid => "- 음식1: 이유\n- 음식2: 이유\n- 음식3: 이유",
        SectionLabel::ProductKeywords => "키워드1, 키워드2, 키워드3",
        SectionLabel::Promo => {
            "2~3문장으로 추천 음식/상품을 자연스럽게 안내(이모지/특수문자/해시태그 없이)"
        }
    }
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    let value = value.trim();
    if value.is_empty() {
        placeholder
    } else {
        value
    }
}

/// Build the prompt for a stored intake record.
pub fn build_prompt(record: &IntakeRecord) -> String {
    let mut prompt = String::with_capacity(1024);
    prompt.push_str(PREAMBLE);
    prompt.push_str("\n\n[고객 입력]\n");
    prompt.push_str(&format!("- 이름: {}\n", record.name));
    prompt.push_str(&format!(
        "- 생년월일: {}\n",
        normalize_birthdate(&record.birthdate)
    ));
    prompt.push_str(&format!(
        "- 출생시간: {}\n",
        or_placeholder(&record.birthtime, BIRTHTIME_PLACEHOLDER)
    ));
    prompt.push_str(&format!("- 음양력: {}\n", record.calendar_type));
    prompt.push_str(&format!("- 성별: {}\n", record.gender));
    prompt.push_str(&format!(
        "- 메모: {}\n\n",
        or_placeholder(&record.memo, MEMO_PLACEHOLDER)
    ));
    prompt.push_str(SECTIONS_INTRO);

    for label in SectionLabel::ALL {
        prompt.push_str("\n\n");
        prompt.push_str(&label.header());
        prompt.push('\n');
        prompt.push_str(section_guide(label));
    }

    prompt
}
