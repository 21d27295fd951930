/// 试卷导出服务
///
/// 负责把某一类别的题目按套别整理成试卷，并交给远程服务
use crate::clients::PaperClient;
use crate::error::AppResult;
use crate::models::{Paper, PaperQuestion, PaperSet, Question, SetName};
use tracing::{info, warn};

/// 按套别整理题目
///
/// 套别按 A-D 排列，没有题目的套别不出现；题目保持录入顺序
pub fn build_paper(questions: &[Question], category: &str) -> Paper {
    let sets = SetName::ALL
        .iter()
        .filter_map(|&set_name| {
            let set_questions: Vec<PaperQuestion> = questions
                .iter()
                .filter(|q| q.belongs_to(set_name, category))
                .map(PaperQuestion::from)
                .collect();
            (!set_questions.is_empty()).then_some(PaperSet {
                set_name,
                questions: set_questions,
            })
        })
        .collect();

    Paper {
        category: category.to_string(),
        sets,
    }
}

/// 试卷导出服务
pub struct PaperService {
    client: PaperClient,
}

impl PaperService {
    pub fn new(client: PaperClient) -> Self {
        Self { client }
    }

    /// 整理并提交试卷
    ///
    /// 没有任何题目时不发起请求，返回 Ok(None)
    pub async fn submit(&self, questions: &[Question], category: &str) -> AppResult<Option<Paper>> {
        let paper = build_paper(questions, category);
        if paper.is_empty() {
            warn!("⚠️ 类别 {} 没有任何题目，跳过试卷提交", category);
            return Ok(None);
        }

        info!(
            "📋 提交试卷: 类别 {}, {} 套, 共 {} 道题",
            category,
            paper.sets.len(),
            paper.question_count()
        );
        self.client.create_paper(&paper).await?;
        info!("✓ 试卷提交成功: {}", category);

        Ok(Some(paper))
    }
}
