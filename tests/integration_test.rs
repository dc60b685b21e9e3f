use lithoformer::config::Config;
use lithoformer::logger;
use lithoformer::{FormatterConfig, LlmService, QuizFormatter, QuizParser};

#[tokio::test]
#[ignore] // 默认忽略，需要手动运行：cargo test -- --ignored
async fn test_parse_and_format_with_live_llm() {
    // 初始化日志
    logger::init();

    // 加载配置（需要 LLM_API_KEY 等环境变量）
    let config = Config::from_env();
    let service = LlmService::new(&config);

    let markdown = "# Chapter 1 Quiz: Basics\n\n\
                    1. What is 2+2?\n\
                    A. 3\nB. 4\nC. 5\nD. 6\n\n\
                    Answer: B\n";

    let items = service.parse_quiz(markdown).await.expect("LLM 解析失败");
    assert!(!items.is_empty(), "应至少解析出一道题目");

    let text = QuizFormatter::new(FormatterConfig::new("Chapter 1 Quiz", "Basics")).format(&items);
    println!("{}", text);
    assert!(text.contains("::(B)"));
}

#[tokio::test]
#[ignore]
async fn test_llm_connection() {
    // 初始化日志
    logger::init();

    let config = Config::from_env();
    let service = LlmService::new(&config);

    let reply = service
        .send_to_llm("Reply with the single word: pong", None)
        .await
        .expect("LLM 调用失败");

    println!("模型 {} 回复: {}", service.model_name(), reply);
    assert!(!reply.trim().is_empty());
}
