//! Job presets.
//!
//! Starting templates the wizard can pre-fill a draft from, one per job.

use super::model::Industry;
use super::request::PersonaDraft;

/// A job the user can start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobPreset {
    /// Identifier used on the command line (`--preset marketer`)
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub name: &'static str,
    pub purpose: &'static str,
    pub target_user: &'static str,
    pub industry: &'static str,
}

impl JobPreset {
    /// A draft pre-filled from this preset. Tone is left for the user.
    pub fn to_draft(&self) -> PersonaDraft {
        PersonaDraft {
            name: self.name.to_string(),
            purpose: self.purpose.to_string(),
            tone: None,
            target_user: self.target_user.to_string(),
            industry: Industry::from_label(self.industry),
        }
    }
}

static JOB_PRESETS: [JobPreset; 6] = [
    JobPreset {
        id: "marketer",
        title: "마케터",
        description: "캠페인 기획, 성과 분석, 보고서 작성",
        name: "마케팅 보고서 도우미",
        purpose: "캠페인 성과 분석 및 보고서 자동 생성",
        target_user: "마케팅 담당자",
        industry: "마케팅/광고",
    },
    JobPreset {
        id: "developer",
        title: "개발자",
        description: "코드 리뷰, 문서화, 기술 조사",
        name: "코드 리뷰 어시스턴트",
        purpose: "코드 품질 검토 및 개선 제안",
        target_user: "소프트웨어 개발자",
        industry: "IT/소프트웨어",
    },
    JobPreset {
        id: "hr",
        title: "HR/인사",
        description: "채용, 면접, 직원 관리",
        name: "채용 면접 도우미",
        purpose: "면접 질문 생성 및 평가 기준 제시",
        target_user: "HR 담당자",
        industry: "인사/채용",
    },
    JobPreset {
        id: "planner",
        title: "기획자",
        description: "프로젝트 기획, 요구사항 정리, 전략 수립",
        name: "회의록 정리 AI",
        purpose: "회의 내용 요약 및 액션 아이템 추출",
        target_user: "기획 담당자",
        industry: "기획/전략",
    },
    JobPreset {
        id: "sales",
        title: "영업/세일즈",
        description: "고객 관리, 제안서 작성, 영업 전략",
        name: "영업 제안서 생성기",
        purpose: "고객 맞춤형 제안서 초안 작성",
        target_user: "영업 담당자",
        industry: "영업/세일즈",
    },
    JobPreset {
        id: "cs",
        title: "고객지원",
        description: "고객 응대, 문제 해결, FAQ 관리",
        name: "고객 응답 어시스턴트",
        purpose: "고객 문의 응답 템플릿 생성",
        target_user: "고객지원 담당자",
        industry: "고객서비스",
    },
];

/// Returns every job preset in display order.
pub fn job_presets() -> &'static [JobPreset] {
    &JOB_PRESETS
}

/// Looks up a preset by id.
pub fn find_job_preset(id: &str) -> Option<&'static JobPreset> {
    JOB_PRESETS.iter().find(|preset| preset.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_preset_maps_to_a_known_industry() {
        for preset in job_presets() {
            assert!(
                preset.to_draft().industry.is_known(),
                "preset {} has an unknown industry",
                preset.id
            );
        }
    }

    #[test]
    fn test_find_job_preset() {
        let preset = find_job_preset("developer").unwrap();
        let draft = preset.to_draft();
        assert_eq!(draft.name, "코드 리뷰 어시스턴트");
        assert_eq!(draft.industry, Industry::Software);
        assert!(draft.tone.is_none());
        assert!(find_job_preset("astronaut").is_none());
    }
}
