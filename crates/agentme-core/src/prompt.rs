//! System prompt compilation.
//!
//! Turns a persona into the instruction text that is prefixed to every user
//! message. Compilation is a pure string template: the same persona always
//! yields the same bytes.

use crate::persona::{Industry, Persona, Tone};

/// Description used when a persona has no tone recorded.
const DEFAULT_TONE_DESCRIPTION: &str =
    "명확하고 친절한 톤으로, 사용자의 요청에 맞추어 유연하게 응답합니다.";

/// How the persona should sound, as written into the prompt.
pub fn tone_description(tone: Option<Tone>) -> &'static str {
    match tone {
        Some(Tone::Professional) => {
            "정중하고 전문적인 톤으로, 비즈니스 환경에 적합한 공식적인 언어를 사용합니다."
        }
        Some(Tone::Creative) => {
            "창의적이고 친근한 톤으로, 혁신적인 아이디어와 브레인스토밍을 돕습니다."
        }
        Some(Tone::Analytical) => {
            "분석적이고 정확한 톤으로, 데이터 기반의 논리적인 정보를 제공합니다."
        }
        Some(Tone::Concise) => {
            "간결하고 요약 위주의 톤으로, 핵심만 빠르게 전달하는 효율적인 스타일입니다."
        }
        None => DEFAULT_TONE_DESCRIPTION,
    }
}

/// The "area of expertise" block for an industry.
pub fn expertise_block(industry: &Industry) -> String {
    let block = match industry {
        Industry::Marketing => {
            "전문 영역:
- 캠페인 기획 및 성과 분석
- 브랜드 전략 및 포지셔닝
- 디지털 마케팅 및 SNS 마케팅
- 고객 인사이트 분석
- ROI 측정 및 보고서 작성"
        }
        Industry::Software => {
            "전문 영역:
- 코드 리뷰 및 품질 개선
- 아키텍처 설계 및 최적화
- 기술 문서 작성
- 버그 분석 및 해결
- 개발 프로세스 개선"
        }
        Industry::HumanResources => {
            "전문 영역:
- 채용 프로세스 설계
- 면접 기법 및 평가
- 조직 문화 및 제도 개선
- 성과 관리 및 피드백
- 교육 훈련 기획"
        }
        Industry::Strategy => {
            "전문 영역:
- 사업 기획 및 전략 수립
- 시장 분석 및 경쟁사 분석
- 프로젝트 관리 및 실행
- 데이터 분석 및 인사이트 도출
- 의사결정 지원"
        }
        Industry::Sales => {
            "전문 영역:
- 영업 전략 및 프로세스
- 고객 관계 관리
- 제안서 및 프레젠테이션
- 협상 기법 및 클로징
- 매출 분석 및 예측"
        }
        Industry::CustomerService => {
            "전문 영역:
- 고객 응대 및 문제 해결
- 서비스 품질 관리
- 고객 만족도 조사 및 개선
- 클레임 처리 및 관리
- 서비스 프로세스 최적화"
        }
        Industry::Other(label) => {
            return format!(
                "전문 영역:
- {label} 분야의 업무 프로세스 개선
- 문제 해결 및 의사결정 지원
- 효율적인 업무 방법론 제시
- 관련 도구 및 리소스 활용"
            );
        }
    };

    block.to_string()
}

/// Compiles a persona into its system prompt.
///
/// Sections, in order: role declaration, role definition, expertise block,
/// instruction checklist, response considerations. No escaping or length
/// limiting is applied.
pub fn compile(persona: &Persona) -> String {
    let name = &persona.name;
    let purpose = &persona.purpose;
    let target_user = &persona.target_user;
    let industry = persona.industry.label();
    let tone = tone_description(persona.tone);
    let expertise = expertise_block(&persona.industry);

    format!(
        "당신은 \"{name}\"입니다.

역할 정의:
- 주요 목적: {purpose}
- 대상 사용자: {target_user}
- 업종/분야: {industry}
- 커뮤니케이션 스타일: {tone}

{expertise}

지침:
1. 항상 당신의 역할과 목적에 맞게 응답하세요.
2. {target_user}의 관점에서 실용적이고 구체적인 도움을 제공하세요.
3. {industry} 분야의 전문성을 바탕으로 정확한 정보를 제공하세요.
4. 복잡한 내용은 단계별로 나누어 설명하세요.
5. 필요시 구체적인 예시나 템플릿을 제공하세요.
6. 사용자의 질문이 불명확하면 명확화를 위한 질문을 하세요.

응답 시 다음을 고려하세요:
- 실무에 바로 적용 가능한 솔루션 제공
- 업무 효율성 향상에 도움이 되는 구체적인 방법론 제시
- 관련 도구나 리소스 추천 (필요시)
- 단계별 액션 플랜 제공"
    )
}

/// The greeting a chat session opens with.
pub fn welcome_message(persona: &Persona) -> String {
    format!(
        "안녕하세요! 저는 {}입니다. {}를 도와드릴 수 있어요. 무엇을 도와드릴까요?",
        persona.name, persona.purpose
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn persona(industry: &str, tone: Option<Tone>) -> Persona {
        Persona {
            id: "p-1".to_string(),
            name: "마케팅 보고서 도우미".to_string(),
            purpose: "캠페인 성과 분석 및 보고서 자동 생성".to_string(),
            tone,
            unknown_tone: None,
            target_user: "마케팅 담당자".to_string(),
            industry: Industry::from_label(industry),
            created: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_compile_is_deterministic() {
        let p = persona("마케팅/광고", Some(Tone::Professional));
        assert_eq!(compile(&p), compile(&p.clone()));
    }

    #[test]
    fn test_compile_marketing_includes_expertise_block_verbatim() {
        let prompt = compile(&persona("마케팅/광고", Some(Tone::Professional)));

        assert!(prompt.contains(
            "전문 영역:
- 캠페인 기획 및 성과 분석
- 브랜드 전략 및 포지셔닝
- 디지털 마케팅 및 SNS 마케팅
- 고객 인사이트 분석
- ROI 측정 및 보고서 작성"
        ));
    }

    #[test]
    fn test_compile_unknown_industry_uses_fallback_block() {
        let prompt = compile(&persona("Unknown Field", Some(Tone::Concise)));

        assert!(prompt.contains("- Unknown Field 분야의 업무 프로세스 개선"));
        assert!(prompt.contains("- 업종/분야: Unknown Field"));
        assert!(prompt.contains("3. Unknown Field 분야의 전문성을 바탕으로"));
    }

    #[test]
    fn test_compile_section_order() {
        let prompt = compile(&persona("IT/소프트웨어", Some(Tone::Analytical)));

        let role = prompt.find("당신은 \"마케팅 보고서 도우미\"입니다.").unwrap();
        let definition = prompt.find("역할 정의:").unwrap();
        let expertise = prompt.find("전문 영역:").unwrap();
        let checklist = prompt.find("지침:").unwrap();
        let considerations = prompt.find("응답 시 다음을 고려하세요:").unwrap();

        assert_eq!(role, 0);
        assert!(role < definition);
        assert!(definition < expertise);
        assert!(expertise < checklist);
        assert!(checklist < considerations);
        assert!(prompt.ends_with("- 단계별 액션 플랜 제공"));
    }

    #[test]
    fn test_compile_includes_tone_description() {
        let prompt = compile(&persona("인사/채용", Some(Tone::Creative)));
        assert!(prompt.contains(
            "- 커뮤니케이션 스타일: 창의적이고 친근한 톤으로, 혁신적인 아이디어와 브레인스토밍을 돕습니다."
        ));
    }

    #[test]
    fn test_compile_without_tone_uses_default_description() {
        let prompt = compile(&persona("인사/채용", None));
        assert!(prompt.contains(DEFAULT_TONE_DESCRIPTION));
    }

    #[test]
    fn test_welcome_message() {
        let message = welcome_message(&persona("마케팅/광고", None));
        assert_eq!(
            message,
            "안녕하세요! 저는 마케팅 보고서 도우미입니다. 캠페인 성과 분석 및 보고서 자동 생성를 도와드릴 수 있어요. 무엇을 도와드릴까요?"
        );
    }
}
