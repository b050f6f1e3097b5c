//! Built-in joke catalog: fixed, in-memory, no I/O.
//!
//! Selection takes the RNG as an argument, so callers that care about
//! reproducibility can seed one.

use std::collections::BTreeMap;

use rand::Rng;

use crate::model::JokeRecord;

pub const CATALOG: &[JokeRecord] = &[
    JokeRecord {
        category: "程序员",
        text: "为什么程序员总是分不清万圣节和圣诞节？因为 Oct 31 == Dec 25",
    },
    JokeRecord { category: "程序员", text: "程序员最讨厌的购物网站：无码超市" },
    JokeRecord {
        category: "程序员",
        text: "我：妈，我去写代码了。妈：哦，你注意颈椎啊。我：好。过了会儿，妈：你在写啥代码？我：Python。妈：你写Python的时候，眼镜蛇怎么办？",
    },
    JokeRecord { category: "程序员", text: "问：如何生成一个随机字符串？答：让新手退出vim" },
    JokeRecord {
        category: "程序员",
        text: "程序员结婚典礼：新郎新娘共同编译爱情程序，结果报错了：Error: 新娘不是静态的(static)",
    },
    JokeRecord { category: "程序员", text: "为什么Java程序员要戴眼镜？因为他们不会C#" },
    JokeRecord { category: "程序员", text: "十个0分程序员：一个在写bug，九个在改bug" },
    JokeRecord {
        category: "程序员",
        text: "程序员解决问题的流程：1. 谷歌 2. 复制 3. 粘贴 4. 运行",
    },
    JokeRecord {
        category: "程序员",
        text: "产品经理：这个需求很简单，怎么实现我不管。程序员：...",
    },
    JokeRecord {
        category: "程序员",
        text: "测试工程师走进酒吧，要了一杯啤酒，要了一杯咖啡，要了0杯啤酒，要了999999杯啤酒，要了一只蜥蜴...",
    },
    JokeRecord {
        category: "生活",
        text: "今天去面试，面试官问我：你有什么特长？我说：我腿特长。面试官：出去！",
    },
    JokeRecord { category: "生活", text: "为什么胖的人更容易快乐？因为心宽体胖嘛！" },
    JokeRecord {
        category: "生活",
        text: "我问朋友：你怎么天天吃泡面？朋友：我在存钱买房。我：吃泡面能存多少钱？朋友：我买泡面送的房子模型。",
    },
    JokeRecord {
        category: "生活",
        text: "今天在电梯里遇到个小朋友，他问我：叔叔，现在几点了？我看着他可爱的脸庞，说：叫哥哥，我就告诉你。小朋友说：哥哥，现在几点了？我说：哥哥也不知道。",
    },
    JokeRecord {
        category: "动物",
        text: "为什么鸡要过马路？因为它想去对面的KFC证明自己还没被淘汰。",
    },
    JokeRecord {
        category: "动物",
        text: "两只番茄过马路，一辆汽车飞驰而过，其中一只番茄被压扁了。另一只番茄指着被压扁的番茄说：哇，番茄酱！",
    },
    JokeRecord {
        category: "学习",
        text: "老师：请用'果然'造句。学生：昨天我先吃苹果然后喝凉水。老师：那是'果然'吗？学生：是呀，我先吃'果'然后喝'水'，不就是'果'然后'水'吗？",
    },
    JokeRecord {
        category: "学习",
        text: "数学老师：一座桥承重10吨，一辆卡车重8吨，装了6吨钢卷，问卡车能过桥吗？学生：不能。老师：为什么？学生：卡车司机没吃饭，饿得开不动车。",
    },
];

/// Outcome of a category-filtered pick. `fallback` is true when the
/// requested category had no jokes and the pick broadened to the whole
/// catalog.
#[derive(Debug, Clone, Copy)]
pub struct JokePick {
    pub joke: &'static JokeRecord,
    pub fallback: bool,
}

/// Uniform pick over the whole catalog.
pub fn random_joke<R: Rng + ?Sized>(rng: &mut R) -> &'static JokeRecord {
    // CATALOG is a non-empty constant.
    &CATALOG[rng.gen_range(0..CATALOG.len())]
}

/// Uniform pick over one category. An unknown category never fails: the
/// pick broadens to the whole catalog and is flagged as a fallback.
pub fn random_joke_in_category<R: Rng + ?Sized>(rng: &mut R, category: &str) -> JokePick {
    let subset: Vec<&'static JokeRecord> =
        CATALOG.iter().filter(|joke| joke.category == category).collect();

    if subset.is_empty() {
        return JokePick { joke: random_joke(rng), fallback: true };
    }

    JokePick { joke: subset[rng.gen_range(0..subset.len())], fallback: false }
}

/// Distinct categories present in the catalog. Order is not significant.
pub fn categories() -> Vec<&'static str> {
    category_counts().into_keys().collect()
}

/// Per-category joke counts. The values sum to `CATALOG.len()`.
pub fn category_counts() -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for joke in CATALOG {
        *counts.entry(joke.category).or_insert(0) += 1;
    }
    counts
}
